//! Cut detection on a directly-follows graph
//!
//! A cut partitions the activities of a sub-log so that the relation
//! between the parts matches one process tree operator. Cuts are tried
//! in the order exclusive choice, sequence, parallel, loop.

use std::collections::BTreeSet;

use hieragg_core::domain::tree::Operator;

use crate::dfg::Dfg;

/// A partition of activities under one operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cut {
    pub operator: Operator,
    pub parts: Vec<BTreeSet<String>>,
}

/// Index-based view of a DFG used by the cut searches
struct Relations {
    names: Vec<String>,
    edge: Vec<Vec<bool>>,
    start: Vec<bool>,
    end: Vec<bool>,
}

impl Relations {
    fn new(dfg: &Dfg) -> Self {
        let names: Vec<String> = dfg.activities.keys().cloned().collect();
        let n = names.len();
        let index = |name: &str| names.binary_search_by(|other| other.as_str().cmp(name)).ok();

        let mut edge = vec![vec![false; n]; n];
        for (source, target) in dfg.edges.keys() {
            if let (Some(i), Some(j)) = (index(source), index(target)) {
                edge[i][j] = true;
            }
        }

        let start = names.iter().map(|a| dfg.is_start(a)).collect();
        let end = names.iter().map(|a| dfg.is_end(a)).collect();

        Self {
            names,
            edge,
            start,
            end,
        }
    }

    fn len(&self) -> usize {
        self.names.len()
    }

    /// Transitive closure of the edge relation
    fn reachability(&self) -> Vec<Vec<bool>> {
        let n = self.len();
        let mut reach = self.edge.clone();
        for k in 0..n {
            for i in 0..n {
                if !reach[i][k] {
                    continue;
                }
                for j in 0..n {
                    if reach[k][j] {
                        reach[i][j] = true;
                    }
                }
            }
        }
        reach
    }

    fn to_parts(&self, groups: Vec<Vec<usize>>) -> Vec<BTreeSet<String>> {
        groups
            .into_iter()
            .map(|g| g.into_iter().map(|i| self.names[i].clone()).collect())
            .collect()
    }
}

/// Connected components of `items` under a symmetric adjacency test.
///
/// Components come back ordered by their smallest member and with
/// members ascending.
fn components(items: &[usize], adjacent: impl Fn(usize, usize) -> bool) -> Vec<Vec<usize>> {
    let mut parent: Vec<usize> = (0..items.len()).collect();

    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }

    for a in 0..items.len() {
        for b in (a + 1)..items.len() {
            if adjacent(items[a], items[b]) {
                let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
                if ra != rb {
                    parent[ra.max(rb)] = ra.min(rb);
                }
            }
        }
    }

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut root_slot: Vec<Option<usize>> = vec![None; items.len()];
    for pos in 0..items.len() {
        let root = find(&mut parent, pos);
        match root_slot[root] {
            Some(slot) => groups[slot].push(items[pos]),
            None => {
                root_slot[root] = Some(groups.len());
                groups.push(vec![items[pos]]);
            }
        }
    }

    for group in &mut groups {
        group.sort_unstable();
    }
    groups.sort_by_key(|g| g[0]);
    groups
}

/// Finds the first applicable cut, if any
pub fn find_cut(dfg: &Dfg) -> Option<Cut> {
    let relations = Relations::new(dfg);
    if relations.len() < 2 {
        return None;
    }

    xor_cut(&relations)
        .or_else(|| sequence_cut(&relations))
        .or_else(|| parallel_cut(&relations))
        .or_else(|| loop_cut(&relations))
}

fn xor_cut(rel: &Relations) -> Option<Cut> {
    let all: Vec<usize> = (0..rel.len()).collect();
    let groups = components(&all, |a, b| rel.edge[a][b] || rel.edge[b][a]);

    (groups.len() > 1).then(|| Cut {
        operator: Operator::Xor,
        parts: rel.to_parts(groups),
    })
}

fn sequence_cut(rel: &Relations) -> Option<Cut> {
    let n = rel.len();
    let reach = rel.reachability();
    let all: Vec<usize> = (0..n).collect();

    // Strongly connected components
    let sccs = components(&all, |a, b| reach[a][b] && reach[b][a]);
    if sccs.len() < 2 {
        return None;
    }

    // Merge components that cannot reach each other in either direction
    let reps: Vec<usize> = sccs.iter().map(|c| c[0]).collect();
    let scc_index: Vec<usize> = (0..sccs.len()).collect();
    let merged = components(&scc_index, |x, y| {
        !reach[reps[x]][reps[y]] && !reach[reps[y]][reps[x]]
    });

    let mut groups: Vec<Vec<usize>> = merged
        .into_iter()
        .map(|ids| {
            let mut members: Vec<usize> = ids.iter().flat_map(|i| sccs[*i].clone()).collect();
            members.sort_unstable();
            members
        })
        .collect();

    if groups.len() < 2 {
        return None;
    }

    let precedes = |a: &[usize], b: &[usize]| a.iter().any(|x| b.iter().any(|y| reach[*x][*y]));
    let ranks: Vec<usize> = groups
        .iter()
        .map(|g| {
            groups
                .iter()
                .filter(|other| !std::ptr::eq(*other, g) && precedes(g.as_slice(), other.as_slice()))
                .count()
        })
        .collect();
    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.sort_by(|a, b| ranks[*b].cmp(&ranks[*a]).then(groups[*a][0].cmp(&groups[*b][0])));
    groups = order.into_iter().map(|i| groups[i].clone()).collect();

    for i in 0..groups.len() {
        for j in (i + 1)..groups.len() {
            for x in &groups[i] {
                for y in &groups[j] {
                    if !reach[*x][*y] || reach[*y][*x] {
                        return None;
                    }
                }
            }
        }
    }

    Some(Cut {
        operator: Operator::Sequence,
        parts: rel.to_parts(groups),
    })
}

fn parallel_cut(rel: &Relations) -> Option<Cut> {
    let all: Vec<usize> = (0..rel.len()).collect();
    let groups = components(&all, |a, b| !(rel.edge[a][b] && rel.edge[b][a]));

    if groups.len() < 2 {
        return None;
    }

    let complete = groups
        .iter()
        .all(|g| g.iter().any(|i| rel.start[*i]) && g.iter().any(|i| rel.end[*i]));

    complete.then(|| Cut {
        operator: Operator::Parallel,
        parts: rel.to_parts(groups),
    })
}

fn loop_cut(rel: &Relations) -> Option<Cut> {
    let n = rel.len();
    let mut in_body: Vec<bool> = (0..n).map(|i| rel.start[i] || rel.end[i]).collect();

    let rest: Vec<usize> = (0..n).filter(|i| !in_body[*i]).collect();
    let mut redo = components(&rest, |a, b| rel.edge[a][b] || rel.edge[b][a]);

    loop {
        let mut moved = false;

        redo.retain(|comp| {
            let touches_body_inside = comp.iter().any(|c| {
                (0..n).any(|x| {
                    in_body[x]
                        && ((rel.edge[x][*c] && !rel.end[x]) || (rel.edge[*c][x] && !rel.start[x]))
                })
            });

            let entered_from_all_ends = comp.iter().all(|c| {
                let from_end = (0..n).any(|e| rel.end[e] && rel.edge[e][*c]);
                !from_end || (0..n).filter(|e| rel.end[*e]).all(|e| rel.edge[e][*c])
            });

            let exits_to_all_starts = comp.iter().all(|c| {
                let to_start = (0..n).any(|s| rel.start[s] && rel.edge[*c][s]);
                !to_start || (0..n).filter(|s| rel.start[*s]).all(|s| rel.edge[*c][s])
            });

            if touches_body_inside || !entered_from_all_ends || !exits_to_all_starts {
                for c in comp {
                    in_body[*c] = true;
                }
                moved = true;
                false
            } else {
                true
            }
        });

        if !moved {
            break;
        }
    }

    if redo.is_empty() {
        return None;
    }

    let body: Vec<usize> = (0..n).filter(|i| in_body[*i]).collect();
    let mut groups = vec![body];
    groups.extend(redo);

    Some(Cut {
        operator: Operator::Loop,
        parts: rel.to_parts(groups),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dfg(raw: &[&[&str]]) -> Dfg {
        let traces: Vec<Vec<String>> = raw
            .iter()
            .map(|t| t.iter().map(|a| a.to_string()).collect())
            .collect();
        Dfg::from_traces(&traces)
    }

    fn names(parts: &[BTreeSet<String>]) -> Vec<Vec<&str>> {
        parts
            .iter()
            .map(|p| p.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn test_components_ordering() {
        let groups = components(&[0, 1, 2, 3], |a, b| (a + b) % 2 == 0);
        assert_eq!(groups, vec![vec![0, 2], vec![1, 3]]);
    }

    #[test]
    fn test_xor_cut() {
        let cut = find_cut(&dfg(&[&["a", "b"], &["c"]])).unwrap();
        assert_eq!(cut.operator, Operator::Xor);
        assert_eq!(names(&cut.parts), vec![vec!["a", "b"], vec!["c"]]);
    }

    #[test]
    fn test_sequence_cut() {
        let cut = find_cut(&dfg(&[&["a", "b", "c"], &["a", "b", "c"]])).unwrap();
        assert_eq!(cut.operator, Operator::Sequence);
        assert_eq!(names(&cut.parts), vec![vec!["a"], vec!["b"], vec!["c"]]);
    }

    #[test]
    fn test_sequence_cut_merges_unreachable() {
        let cut = find_cut(&dfg(&[&["a", "c"], &["b", "c"]])).unwrap();
        assert_eq!(cut.operator, Operator::Sequence);
        assert_eq!(names(&cut.parts), vec![vec!["a", "b"], vec!["c"]]);
    }

    #[test]
    fn test_parallel_cut() {
        let cut = find_cut(&dfg(&[&["a", "b"], &["b", "a"]])).unwrap();
        assert_eq!(cut.operator, Operator::Parallel);
        assert_eq!(names(&cut.parts), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_loop_cut() {
        let cut = find_cut(&dfg(&[&["a", "b", "a"], &["a"]])).unwrap();
        assert_eq!(cut.operator, Operator::Loop);
        assert_eq!(names(&cut.parts), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_no_cut_for_single_activity() {
        assert!(find_cut(&dfg(&[&["a", "a"]])).is_none());
    }
}
