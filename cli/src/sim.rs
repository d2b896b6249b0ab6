use std::io::Write;

use anyhow::Context;
use dvsim::engine::{ConvergenceEngine, RoundSnapshot};
use dvsim::framework::AdvertisementPolicy;
use dvsim::network::Network;
use dvsim::policy::{PlainPolicy, SplitHorizon};
use log::info;
use serde::Serialize;

use crate::config::{OutputFormat, Policy, Settings};
use crate::format::{
    convergence_view, snapshot_view, write_routing_tables, write_snapshot, ConvergenceView,
    SnapshotView,
};
use crate::parse::Input;
use crate::system::TextSystem;

/// Everything observed during one convergence run, as emitted in JSON mode
#[derive(Serialize)]
struct RunReport {
    run: usize,
    snapshots: Vec<SnapshotView>,
    convergence: ConvergenceView,
}

pub fn simulate<W: Write>(input: &Input, settings: &Settings, out: &mut W) -> anyhow::Result<()> {
    match settings.policy {
        Policy::Plain => {
            let engine = ConvergenceEngine::with_params(PlainPolicy, settings.params.clone());
            run(engine, input, settings.format, out)
        }
        Policy::SplitHorizon => {
            let engine = ConvergenceEngine::with_params(SplitHorizon, settings.params.clone());
            run(engine, input, settings.format, out)
        }
    }
}

/// Converges the initial topology, then, if there are any updates, applies them all and converges
/// once more
fn run<P, W>(
    engine: ConvergenceEngine<P>,
    input: &Input,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()>
where
    P: AdvertisementPolicy<TextSystem>,
    W: Write,
{
    let mut network = Network::<TextSystem>::build(&input.nodes, &input.topology)
        .context("building topology")?;
    converge(&engine, &mut network, 0, format, out)?;

    if !input.updates.is_empty() {
        info!("Applying {} topology updates", input.updates.len());
        network.apply_updates(&input.updates).context("applying updates")?;
        converge(&engine, &mut network, 1, format, out)?;
    }
    Ok(())
}

fn converge<P, W>(
    engine: &ConvergenceEngine<P>,
    network: &mut Network<TextSystem>,
    run: usize,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()>
where
    P: AdvertisementPolicy<TextSystem>,
    W: Write,
{
    let mut snapshots = Vec::new();
    let result = engine.run_observed(network, &mut |s: &RoundSnapshot<TextSystem>| {
        snapshots.push(s.clone())
    });

    if format == OutputFormat::Text {
        for snapshot in &snapshots {
            write_snapshot(out, snapshot)?;
        }
    }
    let convergence = result.with_context(|| format!("convergence run {run}"))?;
    info!("Run {run} converged after {} rounds", convergence.rounds);

    match format {
        OutputFormat::Text => write_routing_tables(out, &convergence.routes)?,
        OutputFormat::Json => {
            let report = RunReport {
                run,
                snapshots: snapshots.iter().map(snapshot_view).collect(),
                convergence: convergence_view(&convergence),
            };
            serde_json::to_writer(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_str;
    use dvsim::framework::ProtocolParams;

    fn settings(policy: Policy, format: OutputFormat) -> Settings {
        Settings {
            policy,
            params: ProtocolParams::default(),
            format,
        }
    }

    fn json_documents(output: &str) -> Vec<serde_json::Value> {
        output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn simulate_str(text: &str, settings: &Settings) -> anyhow::Result<String> {
        let input = parse_str(text)?;
        let mut out = Vec::new();
        simulate(&input, settings, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn triangle_text_output() {
        let text = "A\nB\nC\nDISTANCEVECTOR\nA B 1\nB C 1\nA C 4\nEND\n";
        for policy in [Policy::Plain, Policy::SplitHorizon] {
            let output = simulate_str(text, &settings(policy, OutputFormat::Text)).unwrap();
            assert!(output.starts_with(
                "=== Step 0 ===\nA Distance Table at t=0\n    A  B  C\n\
                 A  0  INF  INF\nB  INF  1  INF\nC  INF  INF  4\n\n"
            ));
            assert!(output.contains("A Routing Table:\nB,B,1\nC,B,2\n\n"));
            assert!(output.contains("C Routing Table:\nA,B,2\nB,B,1\n\n"));
            assert_eq!(output.matches("Routing Table:").count(), 3);
        }
    }

    #[test]
    fn updates_trigger_a_second_run() {
        let text = "A\nB\nC\nDISTANCEVECTOR\nA B 1\nB C 1\nUPDATE\nB C -1\nEND\n";
        let output = simulate_str(text, &settings(Policy::Plain, OutputFormat::Text)).unwrap();
        assert_eq!(output.matches("A Routing Table:").count(), 2);
        assert!(output.contains("A Routing Table:\nB,B,1\nC,B,2\n\n"));
        assert!(output.contains("A Routing Table:\nB,B,1\nC,INF,INF\n\n"));
        assert!(output.ends_with("C Routing Table:\nA,INF,INF\nB,INF,INF\n\n"));
    }

    #[test]
    fn json_output_has_one_document_per_run() {
        let text = "A\nB\nDISTANCEVECTOR\nA B 3\nUPDATE\nB D 2\nEND\n";
        let settings = settings(Policy::SplitHorizon, OutputFormat::Json);
        let output = simulate_str(text, &settings).unwrap();
        let docs = json_documents(&output);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["run"], 0);
        assert_eq!(docs[1]["run"], 1);
        assert!(docs[1]["convergence"]["rounds"].as_u64().unwrap() >= 1);
        assert_eq!(
            docs[1]["convergence"]["routes"]["A"]["D"],
            serde_json::json!({"next_hop": "B", "cost": 5})
        );
    }

    #[test]
    fn json_output_spells_out_unreachable_costs() {
        let text = "A\nB\nC\nDISTANCEVECTOR\nA B 1\nEND\n";
        let output = simulate_str(text, &settings(Policy::Plain, OutputFormat::Json)).unwrap();
        assert!(!output.contains("9999"));

        let docs = json_documents(&output);
        assert_eq!(docs.len(), 1);
        let first = &docs[0]["snapshots"][0];
        assert_eq!(first["round"], 0);
        assert_eq!(first["tables"]["A"]["B"], serde_json::json!({"A": "INF", "B": 1, "C": "INF"}));
        assert_eq!(first["tables"]["A"]["A"]["A"], 0);

        let routes = &docs[0]["convergence"]["routes"];
        assert_eq!(routes["A"]["B"], serde_json::json!({"next_hop": "B", "cost": 1}));
        assert_eq!(routes["A"]["C"], serde_json::json!({"next_hop": "INF", "cost": "INF"}));
        assert_eq!(routes["C"]["A"]["cost"], "INF");
    }

    #[test]
    fn non_convergence_is_an_error() {
        let text = "A\nB\nDISTANCEVECTOR\nA B 3\nEND\n";
        let mut s = settings(Policy::Plain, OutputFormat::Text);
        s.params.max_rounds = 1;
        let err = simulate_str(text, &s).unwrap_err();
        assert!(format!("{err:#}").contains("did not converge within 1 rounds"));
    }

    #[test]
    fn unknown_topology_node_is_an_error() {
        let text = "A\nB\nDISTANCEVECTOR\nA Q 3\nEND\n";
        let err = simulate_str(text, &settings(Policy::Plain, OutputFormat::Text)).unwrap_err();
        assert!(format!("{err:#}").contains("Q is not part of the network"));
    }
}
