use crate::case::CaseMatrix;
use crate::constants::NO_CORS_LABEL;
use crate::candidate::SharedCandidate;
use crate::error::HarnessError;
use crate::handler::SharedHandler;
use crate::label::pad;
use http::Request;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info};

/// A handler ready for measurement together with the request it serves.
#[derive(Clone)]
pub struct SubBenchmark {
    pub label: String,
    pub case: &'static str,
    pub candidate: &'static str,
    pub handler: SharedHandler,
    pub request: Arc<Request<()>>,
}

impl std::fmt::Debug for SubBenchmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubBenchmark")
            .field("label", &self.label)
            .field("case", &self.case)
            .field("candidate", &self.candidate)
            .finish_non_exhaustive()
    }
}

/// Wraps every case's terminal handler with every candidate.
///
/// Cases without a policy are registered once, unwrapped, under
/// [`NO_CORS_LABEL`]. The first candidate that rejects a configuration aborts
/// the whole registration.
pub fn register(
    matrix: &CaseMatrix,
    candidates: &[SharedCandidate],
    label_width: usize,
) -> Result<Vec<SubBenchmark>, HarnessError> {
    let mut registered = Vec::with_capacity(matrix.len() * candidates.len().max(1));
    let mut seen = HashSet::new();

    for case in matrix.cases() {
        let Some(config) = &case.config else {
            push_unique(
                &mut registered,
                &mut seen,
                SubBenchmark {
                    label: pad(NO_CORS_LABEL, case.desc, label_width)?,
                    case: case.desc,
                    candidate: NO_CORS_LABEL,
                    handler: Arc::clone(&case.handler),
                    request: Arc::clone(&case.request),
                },
            )?;
            continue;
        };

        for candidate in candidates {
            let label = pad(candidate.label(), case.desc, label_width)?;
            let middleware = candidate.middleware(config).map_err(|source| {
                error!(
                    candidate = candidate.label(),
                    case = case.desc,
                    %source,
                    "candidate rejected origin configuration"
                );
                HarnessError::Candidate {
                    candidate: candidate.label(),
                    case: case.desc,
                    config: config.clone(),
                    source,
                }
            })?;

            push_unique(
                &mut registered,
                &mut seen,
                SubBenchmark {
                    label,
                    case: case.desc,
                    candidate: candidate.label(),
                    handler: middleware.wrap(Arc::clone(&case.handler)),
                    request: Arc::clone(&case.request),
                },
            )?;
        }
    }

    info!(
        cases = matrix.len(),
        candidates = candidates.len(),
        sub_benchmarks = registered.len(),
        "registered benchmark handlers"
    );
    Ok(registered)
}

fn push_unique(
    registered: &mut Vec<SubBenchmark>,
    seen: &mut HashSet<String>,
    sub: SubBenchmark,
) -> Result<(), HarnessError> {
    if !seen.insert(sub.label.clone()) {
        return Err(HarnessError::DuplicateLabel(sub.label));
    }
    debug!(label = %sub.label, "registered sub-benchmark");
    registered.push(sub);
    Ok(())
}

#[cfg(test)]
#[path = "adapter_test.rs"]
mod adapter_test;
