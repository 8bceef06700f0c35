//! Builds a [`ProgramModel`] from a `path -> source` mapping.

use callwire_core::config::AnalysisConfig;
use callwire_core::errors::{AnalysisError, ParseError};
use tracing::{debug, info, warn};

use super::symbols::FileId;
use super::{paths, ProgramModel, SourceFile};
use crate::identity;
use crate::parsers::ParserSet;

impl ProgramModel {
    /// Parse every file of the input mapping.
    ///
    /// Files are ordered by normalized path so the model is identical no matter
    /// how the caller's map iterates. Files that fail to parse, are too large,
    /// or (unless tolerated) contain syntax errors are left out and recorded.
    pub fn build<I, K, V>(files: I, parsers: &ParserSet, config: &AnalysisConfig) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut inputs: Vec<(String, String, String)> = files
            .into_iter()
            .map(|(path, source)| {
                let path = path.as_ref();
                (
                    paths::normalize_path(path),
                    path.to_string(),
                    source.as_ref().to_string(),
                )
            })
            .collect();
        inputs.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        inputs.dedup_by(|later, first| {
            let duplicate = later.0 == first.0;
            if duplicate {
                debug!(path = %later.1, "duplicate path spelling ignored");
            }
            duplicate
        });

        let project_root = match &config.project_root {
            Some(root) => paths::normalize_path(root),
            None => paths::common_dir(inputs.iter().map(|(n, _, _)| n.as_str())),
        };
        let max_bytes = config.effective_max_file_bytes();
        let tolerate = config.effective_tolerate_syntax_errors();

        let mut model = ProgramModel {
            project_root,
            module_roots: config
                .module_roots
                .iter()
                .map(|r| paths::normalize_path(r))
                .collect(),
            ..Default::default()
        };

        for (normalized, path, source) in inputs {
            model.input_paths.insert(normalized.clone());

            if source.len() > max_bytes {
                warn!(path = %path, size = source.len(), limit = max_bytes, "file too large, skipped");
                model.errors.push(AnalysisError::Parse(ParseError::FileTooLarge {
                    path,
                    size: source.len(),
                    limit: max_bytes,
                }));
                continue;
            }

            let parsed = match parsers.parse(&source, &path) {
                Ok(parsed) => parsed,
                Err(e @ ParseError::UnsupportedLanguage { .. }) => {
                    debug!(path = %path, "unsupported language, skipped");
                    model.errors.push(e.into());
                    continue;
                }
                Err(e) => {
                    warn!(path = %path, error = %e, "parse failed, skipped");
                    model.errors.push(e.into());
                    continue;
                }
            };

            debug!(
                path = %path,
                language = %parsed.language,
                parse_time_us = parsed.parse_time_us,
                errors = parsed.error_count,
                "file parsed"
            );

            if parsed.has_errors() && !tolerate {
                let (line, column) = parsed
                    .error_ranges
                    .first()
                    .map_or((0, 0), |r| (r.start.line + 1, r.start.column + 1));
                warn!(path = %path, errors = parsed.error_count, line, column, "syntax errors, file excluded");
                model.errors.push(AnalysisError::Parse(ParseError::PartialParse {
                    path,
                    error_count: parsed.error_count,
                    line,
                    column,
                }));
                continue;
            }

            let id = FileId(model.files.len() as u32);
            let simplified = paths::relative_to(&normalized, &model.project_root).to_string();
            let file_key = identity::file_key(&simplified, &normalized);
            model.by_path.insert(normalized.clone(), id);
            model.files.push(SourceFile {
                id,
                path,
                normalized,
                simplified,
                file_key,
                source,
                parsed,
            });
        }

        info!(
            files = model.files.len(),
            skipped = model.errors.len(),
            root = %model.project_root,
            "program model built"
        );
        model
    }
}
