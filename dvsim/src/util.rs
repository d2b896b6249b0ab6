use crate::router::INF;
use std::cmp::min;

/// Adds two costs, treating `INF` as absorbing
///
/// # Arguments
///
/// * `cost_a`: First cost
/// * `cost_b`: Second cost
///
/// returns: u16, never larger than `INF`
///
/// # Examples
///
/// ```
/// use dvsim::router::INF;
/// assert_eq!(dvsim::util::sum_inf(1, 2), 3);
/// assert_eq!(dvsim::util::sum_inf(1, INF), INF);
/// assert_eq!(dvsim::util::sum_inf(9000, 9000), INF);
/// ```
pub fn sum_inf(cost_a: u16, cost_b: u16) -> u16 {
    if cost_a == INF || cost_b == INF {
        INF
    } else {
        min(INF as u32, cost_a as u32 + cost_b as u32) as u16
    }
}

/// Clamps a link cost into the representable range
///
/// ```
/// use dvsim::router::INF;
/// assert_eq!(dvsim::util::clamp_cost(7), 7);
/// assert_eq!(dvsim::util::clamp_cost(20000), INF);
/// ```
pub fn clamp_cost(cost: u16) -> u16 {
    min(cost, INF)
}

/// Serializes address keyed maps as a sequence of `(address, value)` pairs, so addresses do not
/// have to be representable as map keys by the data format.
#[cfg(feature = "serde")]
pub(crate) mod address_pairs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_with::{As, Same};
    use std::collections::BTreeMap;

    pub fn serialize<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        As::<Vec<(Same, Same)>>::serialize(map, serializer)
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        K: Deserialize<'de> + Ord,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        As::<Vec<(Same, Same)>>::deserialize(deserializer)
    }
}
