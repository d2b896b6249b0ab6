use std::collections::HashSet;
use std::io::BufRead;

use dvsim::concepts::edge::Edge;
use thiserror::Error;

use crate::system::TextSystem;

pub const TOPOLOGY_MARKER: &str = "DISTANCEVECTOR";
pub const UPDATE_MARKER: &str = "UPDATE";
pub const END_MARKER: &str = "END";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: expected `<node> <node> <cost>`, got `{text}`")]
    MalformedEdge { line: usize, text: String },
    #[error("line {line}: cost `{text}` is not an integer")]
    InvalidCost { line: usize, text: String },
    #[error("line {line}: negative cost {cost}, only -1 is allowed")]
    NegativeCost { line: usize, cost: i64 },
    #[error("line {line}: link from {node} to itself")]
    SelfLoop { line: usize, node: String },
    #[error("line {line}: node {node} is listed twice")]
    DuplicateNode { line: usize, node: String },
    #[error("line {line}: node name `{text}` contains whitespace")]
    MalformedNode { line: usize, text: String },
    #[error("failed to read input: {0}")]
    Io(String),
}

/// The already-validated content of an input description
#[derive(Debug, Default, PartialEq)]
pub struct Input {
    pub nodes: Vec<String>,
    pub topology: Vec<Edge<TextSystem>>,
    pub updates: Vec<Edge<TextSystem>>,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Nodes,
    Topology,
    Update,
}

#[cfg(test)]
pub fn parse_str(input: &str) -> Result<Input, ParseError> {
    parse(input.as_bytes())
}

/// Reads node names, then topology edges after the topology marker, then update edges after the
/// update marker, stopping at the end marker or at the end of input. Blank lines are ignored.
pub fn parse<R: BufRead>(reader: R) -> Result<Input, ParseError> {
    let mut input = Input::default();
    let mut seen = HashSet::new();
    let mut section = Section::Nodes;

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| ParseError::Io(e.to_string()))?;
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line {
            TOPOLOGY_MARKER => {
                section = Section::Topology;
                continue;
            }
            UPDATE_MARKER => {
                section = Section::Update;
                continue;
            }
            END_MARKER => break,
            _ => {}
        }

        match section {
            Section::Nodes => {
                if line.split_whitespace().count() != 1 {
                    return Err(ParseError::MalformedNode {
                        line: line_no,
                        text: line.to_string(),
                    });
                }
                if !seen.insert(line.to_string()) {
                    return Err(ParseError::DuplicateNode {
                        line: line_no,
                        node: line.to_string(),
                    });
                }
                input.nodes.push(line.to_string());
            }
            Section::Topology => input.topology.push(parse_edge(line_no, line)?),
            Section::Update => input.updates.push(parse_edge(line_no, line)?),
        }
    }
    Ok(input)
}

fn parse_edge(line_no: usize, line: &str) -> Result<Edge<TextSystem>, ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let &[a, b, cost] = fields.as_slice() else {
        return Err(ParseError::MalformedEdge {
            line: line_no,
            text: line.to_string(),
        });
    };
    if a == b {
        return Err(ParseError::SelfLoop {
            line: line_no,
            node: a.to_string(),
        });
    }
    let cost: i64 = cost.parse().map_err(|_| ParseError::InvalidCost {
        line: line_no,
        text: cost.to_string(),
    })?;
    match cost {
        -1 => Ok(Edge::removal(a.to_string(), b.to_string())),
        c if c < 0 => Err(ParseError::NegativeCost { line: line_no, cost: c }),
        // anything at or above u16::MAX is unreachable anyway, the router clamps it to INF
        c => Ok(Edge::link(
            a.to_string(),
            b.to_string(),
            u16::try_from(c).unwrap_or(u16::MAX),
        )),
    }
}
