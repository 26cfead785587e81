//! Cartesian parameter expansion for golden-master testing.

use std::fmt::Display;

use serde::Serialize;

/// One output captured by the golden-master runner: a 1-based sequence id,
/// the human-joined parameter combination, and whatever the wrapper
/// returned for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasterRecord<O> {
    pub id: usize,
    pub params: String,
    pub output: O,
}

/// Generates every combination of the given parameter value lists.
///
/// The first parameter varies fastest and the last slowest; this order is
/// part of the snapshot contract, since it fixes the record ids and with
/// them the snapshot bytes. An empty outer slice yields zero combinations,
/// not a single empty one. Duplicate input values produce duplicate
/// combinations.
pub fn generate<T: Clone>(params: &[Vec<T>]) -> Vec<Vec<T>> {
    if params.is_empty() {
        return Vec::new();
    }

    let mut result: Vec<Vec<T>> = vec![Vec::new()];
    for values in params {
        let mut extended = Vec::with_capacity(result.len() * values.len());
        for value in values {
            for combination in &result {
                let mut next = combination.clone();
                next.push(value.clone());
                extended.push(next);
            }
        }
        result = extended;
    }
    result
}

/// Invokes `wrapper` once per combination, strictly in generation order,
/// collecting one [`MasterRecord`] per invocation. Error conversion is the
/// wrapper's responsibility; the output is captured as opaque data.
pub fn run<T, O, W>(mut wrapper: W, params: &[Vec<T>]) -> Vec<MasterRecord<O>>
where
    T: Display + Clone,
    W: FnMut(&[T]) -> O,
{
    generate(params)
        .into_iter()
        .enumerate()
        .map(|(index, combination)| MasterRecord {
            id: index + 1,
            params: join_params(&combination),
            output: wrapper(&combination),
        })
        .collect()
}

fn join_params<T: Display>(combination: &[T]) -> String {
    combination
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
