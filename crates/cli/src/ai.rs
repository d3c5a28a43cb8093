//! The external AI collaborator (§1, §4.9, §6): AI-assisted log
//! summarization is explicitly out of scope for the core — it lives
//! behind an HTTP call to a separate service keyed by `AI_API_KEY`. The
//! CLI surface reserves `logs --ai` for it but does not act on it beyond
//! this no-op today.

/// Acknowledge the `--ai` flag without calling out to the collaborator.
pub fn note_unimplemented() -> String {
    "--ai requested, but log summarization is handled by a separate AI collaborator \
     service not bundled with this core; set AI_API_KEY and point that service at this output."
        .to_string()
}
