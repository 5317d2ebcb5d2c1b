//! Parsers for the textual output of the git subcommands reposnap relies on.

/// Extract remote URLs from `git remote -v` output.
///
/// Every non-blank line of the form `<name> <url> (<fetch|push>)` contributes its
/// second token. Fetch and push lines are both kept, so a single remote shows up
/// twice in a row.
pub fn parse_remote_urls(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
        .collect()
}

/// Interpret `git rev-parse --is-bare-repository` output.
pub fn parse_is_bare(output: &str) -> bool {
    output.trim() == "true"
}
