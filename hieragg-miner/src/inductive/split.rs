//! Log splitting along a cut

use std::collections::HashMap;

use hieragg_core::domain::tree::Operator;

use super::cuts::Cut;

type SubLog = Vec<Vec<String>>;

/// Splits `traces` into one sub-log per part of `cut`.
///
/// Traces must be non-empty for exclusive choice splits; other splits
/// may yield empty traces, which the recursion turns into silent steps.
pub fn split_log(cut: &Cut, traces: &[Vec<String>]) -> Vec<SubLog> {
    let part_of: HashMap<&str, usize> = cut
        .parts
        .iter()
        .enumerate()
        .flat_map(|(i, part)| part.iter().map(move |a| (a.as_str(), i)))
        .collect();

    match cut.operator {
        Operator::Xor => split_xor(cut.parts.len(), &part_of, traces),
        Operator::Sequence | Operator::Parallel => project(cut.parts.len(), &part_of, traces),
        Operator::Loop => split_loop(cut.parts.len(), &part_of, traces),
    }
}

fn split_xor(parts: usize, part_of: &HashMap<&str, usize>, traces: &[Vec<String>]) -> Vec<SubLog> {
    let mut logs = vec![SubLog::new(); parts];
    for trace in traces {
        if let Some(part) = trace.first().and_then(|a| part_of.get(a.as_str())) {
            logs[*part].push(trace.clone());
        }
    }
    logs
}

/// Projects every trace onto each part
fn project(parts: usize, part_of: &HashMap<&str, usize>, traces: &[Vec<String>]) -> Vec<SubLog> {
    let mut logs = vec![SubLog::with_capacity(traces.len()); parts];
    for trace in traces {
        let mut projected = vec![Vec::new(); parts];
        for activity in trace {
            if let Some(part) = part_of.get(activity.as_str()) {
                projected[*part].push(activity.clone());
            }
        }
        for (log, sub) in logs.iter_mut().zip(projected) {
            log.push(sub);
        }
    }
    logs
}

/// Cuts traces into alternating body and redo segments.
///
/// Part 0 is the body; each redo segment goes to the part holding its
/// first activity.
fn split_loop(parts: usize, part_of: &HashMap<&str, usize>, traces: &[Vec<String>]) -> Vec<SubLog> {
    let mut logs = vec![SubLog::new(); parts];

    for trace in traces {
        let mut segment: Vec<String> = Vec::new();
        let mut segment_part: Option<usize> = None;

        for activity in trace {
            let part = part_of.get(activity.as_str()).copied().unwrap_or(0);
            let switches = match segment_part {
                Some(current) => (current == 0) != (part == 0),
                None => false,
            };

            if switches {
                if let Some(current) = segment_part {
                    logs[current].push(std::mem::take(&mut segment));
                }
                segment_part = Some(part);
            } else if segment_part.is_none() {
                segment_part = Some(part);
            }

            segment.push(activity.clone());
        }

        if let Some(current) = segment_part {
            logs[current].push(segment);
        }
    }

    logs
}
