use regex::Regex;
use std::sync::LazyLock;

static SAVEDCMD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(saved)?cmd_.*?:=\s*(?P<command>.+)$").expect("static regex")
});
static SOURCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^source.*?:=\s*.+$").expect("static regex"));
static CONFIG_DEPENDENCY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$\(wildcard (include/config/[^)]+)\)").expect("static regex")
});
static OBJTOOL_DEPENDENCY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$\(wildcard \./tools/objtool/objtool\)").expect("static regex")
});
static WILDCARD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\(wildcard (?P<path>[^)]+)\)").expect("static regex"));
static VALID_PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(/)?(([\w\-., ]*)/)*[\w\-., ]+$").expect("static regex")
});
static INCBIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s*\.incbin\s+"(?P<path>[^"]+)""#).expect("static regex"));

/// One `.incbin "<path>"` directive of an assembly file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncbinStatement {
    /// Referenced path, as written
    pub path: String,
    /// The directive as it appears in the file, trimmed
    pub statement: String,
}

/// Raw contents of a `.cmd` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdFileContents {
    /// Command text of the `savedcmd_` line
    pub savedcmd: String,
    /// Entries of the `deps_` block, unparsed
    pub deps: Vec<String>,
}

/// CmdFileParser service for the text of Kbuild `.cmd` files
///
/// Three layouts are recognised:
///
/// ```text
/// savedcmd_<target> := <command>                  (command only)
///
/// savedcmd_<target> := <command>                  (single dependency)
/// <target>: <dependency>
///
/// savedcmd_<target> := <command>                  (full)
/// source_<target> := <source>
/// deps_<target> := \
///   <dependency> \
///   ...
/// <make rules>
/// ```
pub struct CmdFileParser;

impl CmdFileParser {
    /// Parses the text of a `.cmd` file
    ///
    /// # Returns
    /// None if the first meaningful line is not a `savedcmd_` assignment
    pub fn parse(text: &str) -> Option<CmdFileContents> {
        let lines: Vec<&str> = text
            .lines()
            .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
            .map(str::trim)
            .collect();

        let savedcmd = SAVEDCMD_PATTERN
            .captures(lines.first()?)?
            .name("command")?
            .as_str()
            .to_string();

        match lines.len() {
            1 => Some(CmdFileContents {
                savedcmd,
                deps: Vec::new(),
            }),
            2 => {
                let dependency = lines[1]
                    .split_once(':')
                    .map(|(_, rest)| rest.trim().trim_start_matches('=').trim())
                    .filter(|dependency| !dependency.is_empty());
                Some(CmdFileContents {
                    savedcmd,
                    deps: dependency.map(str::to_string).into_iter().collect(),
                })
            }
            _ => {
                if !SOURCE_PATTERN.is_match(lines[1]) {
                    tracing::debug!("No 'source_' entry after savedcmd '{}'", savedcmd);
                    return Some(CmdFileContents {
                        savedcmd,
                        deps: Vec::new(),
                    });
                }

                // lines[2] is the `deps_<target> := \` assignment itself
                let deps = lines
                    .iter()
                    .skip(3)
                    .map_while(|line| line.strip_suffix('\\'))
                    .map(|line| line.trim().to_string())
                    .collect();

                Some(CmdFileContents { savedcmd, deps })
            }
        }
    }

    /// Extracts input paths from the entries of a `deps_` block
    ///
    /// Kconfig symbols (`include/config/...`) and the objtool binary are
    /// dropped; `$(wildcard X)` yields `X`. Entries that do not look like a
    /// path are skipped.
    pub fn parse_dependencies(deps: &[String]) -> Vec<String> {
        deps.iter()
            .map(|dep| dep.trim())
            .filter_map(|dep| {
                if CONFIG_DEPENDENCY_PATTERN.is_match(dep) || OBJTOOL_DEPENDENCY_PATTERN.is_match(dep)
                {
                    return None;
                }
                if let Some(caps) = WILDCARD_PATTERN.captures(dep) {
                    return Some(caps["path"].to_string());
                }
                if VALID_PATH_PATTERN.is_match(dep) {
                    return Some(dep.to_string());
                }
                tracing::debug!("Skipped dependency '{}' of unrecognized format", dep);
                None
            })
            .collect()
    }

    /// `.incbin "<path>"` directives of an assembly file
    pub fn parse_incbin(content: &str) -> Vec<IncbinStatement> {
        INCBIN_PATTERN
            .captures_iter(content)
            .map(|caps| IncbinStatement {
                path: caps["path"].to_string(),
                statement: caps[0].trim().to_string(),
            })
            .collect()
    }
}
