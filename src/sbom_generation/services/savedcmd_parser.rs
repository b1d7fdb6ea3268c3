use crate::shared::Result;
use anyhow::{anyhow, bail};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Labels of commands that only manage files and never name the tool of a build step
const HOUSEKEEPING_LABELS: &[&str] = &["rm", "mkdir", "touch", "echo", "true", "false", "shell"];

/// `$$(...)` subshells are kept together as one word
static SUBCOMMAND_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\$\(([^()]*)\)").expect("static regex"));

/// Simple, single-level `if <cond>; then <body>; fi` block
static IF_BLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^if(.*?);\s*then(.*?);\s*fi\b").expect("static regex")
});

static COMPOUND_BODY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*[\(\{](.*)[\)\}]\s*>").expect("static regex"));

static DD_INPUT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^dd.*?if=(\S+)").expect("static regex"));

type ParseFn = fn(&str) -> Result<Vec<String>>;

/// One entry of the command registry
struct CommandRule {
    pattern: Regex,
    label: &'static str,
    parse: ParseFn,
}

fn rule(pattern: &str, label: &'static str, parse: ParseFn) -> CommandRule {
    CommandRule {
        pattern: Regex::new(pattern).expect("static regex"),
        label,
        parse,
    }
}

/// Recognised single commands, matched in order against the start of the command
static COMMAND_RULES: LazyLock<Vec<CommandRule>> = LazyLock::new(|| {
    vec![
        // Compound commands writing to a file
        rule(r"(?s)^\(.*?\)\s*>", "shell", parse_compound),
        rule(r"(?s)^\{.*?\}\s*>", "shell", parse_compound),
        // Standard utilities
        rule(r"^rm\b", "rm", parse_noop),
        rule(r"^mkdir\b", "mkdir", parse_noop),
        rule(r"^touch\b", "touch", parse_noop),
        rule(r"^cat\b.*?[|>]", "cat", |c| {
            parse_cat(before(before(c, '|'), '>'))
        }),
        rule(r"^echo[^|]*$", "echo", parse_noop),
        rule(r"^sed.*?>", "sed", |c| parse_sed(before(c, '>'))),
        rule(r"^sed\b", "sed", parse_noop),
        rule(r"^awk.*?<.*?>", "awk", |c| {
            Ok(vec![before(after(c, '<'), '>').to_string()])
        }),
        rule(r"^awk.*?>", "awk", |c| parse_awk(before(c, '>'))),
        rule(r"^(/bin/)?true\b", "true", parse_noop),
        rule(r"^(/bin/)?false\b", "false", parse_noop),
        rule(r"^openssl\s+req.*?-new.*?-keyout", "openssl", parse_noop),
        // Compilers and code generators
        rule(r"^([^\s]+-)?(gcc|clang|cc)\b", "cc", parse_compiler),
        rule(r"^([^\s]+-)?ld(\.bfd|\.lld)?\b", "ld", parse_ld),
        rule(
            r"^printf\b.*\| xargs ([^\s]+-)?ar\b",
            "ar",
            parse_ar_piped_xargs,
        ),
        rule(r"^([^\s]+-)?ar\b", "ar", parse_ar),
        rule(r"^([^\s]+-)?nm\b.*?\|", "nm", parse_nm_piped),
        rule(r"^([^\s]+-)?objcopy\b", "objcopy", parse_objcopy),
        rule(r"^([^\s]+-)?strip\b", "strip", parse_strip),
        rule(r"^.*?rustc\b", "rustc", |c| last_positional_with_suffix(c, &[".rs"])),
        rule(r"^.*?rustdoc\b", "rustdoc", |c| {
            last_positional_with_suffix(c, &[".rs"])
        }),
        rule(r"^flex\b", "flex", |c| last_positional_with_suffix(c, &[".l"])),
        rule(r"^bison\b", "bison", |c| last_positional_with_suffix(c, &[".y"])),
        rule(r"^bindgen\b", "bindgen", parse_bindgen),
        rule(r"^perl\b", "perl", parse_perl),
        // Kernel build scripts and host tools
        rule(r"^(.*/)?link-vmlinux\.sh\b", "link-vmlinux.sh", |_| {
            Ok(vec!["vmlinux.a".to_string()])
        }),
        rule(r"^.*?sh (.*/)?syscallhdr\.sh\b", "syscallhdr.sh", |c| {
            nth_positional(&positionals(&tokenize(c.trim(), &["--emit-nr"])?), 2)
        }),
        rule(r"^.*?sh (.*/)?syscalltbl\.sh\b", "syscalltbl.sh", |c| {
            nth_positional(&positionals(&tokenize(c.trim(), &[])?), 2)
        }),
        rule(r"^.*?sh (.*/)?mkcapflags\.sh\b", "mkcapflags.sh", |c| {
            let words = positionals_only(c)?;
            Ok(vec![nth(&words, 3)?, nth(&words, 4)?])
        }),
        rule(r"^.*?sh (.*/)?orc_hash\.sh\b", "orc_hash.sh", |c| {
            nth_positional(&positionals_only(c)?, 3)
        }),
        rule(r"^.*?sh (.*/)?xen-hypercalls\.sh\b", "xen-hypercalls.sh", |c| {
            Ok(positionals_only(c)?.into_iter().skip(3).collect())
        }),
        rule(r"^.*?sh (.*/)?gen_initramfs\.sh\b", "gen_initramfs.sh", |c| {
            Ok(positionals(&tokenize(c, &[])?).into_iter().skip(2).collect())
        }),
        rule(r"^.*?sh (.*/)?checkundef\.sh\b", "checkundef.sh", parse_noop),
        rule(r"^(.*/)?vdso2c\b", "vdso2c", |c| {
            let words = positionals_only(c)?;
            Ok(vec![nth(&words, 1)?, nth(&words, 2)?])
        }),
        rule(r"^(.*/)?mkpiggy.*?>", "mkpiggy", |c| {
            nth_positional(&positionals_only(before(c, '>'))?, 1)
        }),
        rule(r"^(.*/)?relocs\b", "relocs", parse_relocs),
        rule(r"^(.*/)?mk_elfconfig.*?<.*?>", "mk_elfconfig", |c| {
            nth_positional(&positionals_only(c)?, 2)
        }),
        rule(r"^(.*/)?tools/build\b", "tools/build", |c| {
            let words = positionals_only(c)?;
            let end = words.len().saturating_sub(1);
            Ok(words.into_iter().take(end).skip(1).collect())
        }),
        rule(r"^(.*/)?certs/extract-cert", "extract-cert", |c| {
            let words = shell_split(c)?;
            Ok(words.get(1).filter(|w| !w.is_empty()).cloned().into_iter().collect())
        }),
        rule(r"^(.*/)?scripts/dtc/dtc\b", "dtc", parse_dtc),
        rule(r"^(.*/)?pnmtologo\b", "pnmtologo", |c| {
            Ok(shell_split(c)?.pop().into_iter().collect())
        }),
        rule(r"^(.*/)?kernel/pi/relacheck", "relacheck", |c| {
            nth_positional(&positionals_only(c)?, 1)
        }),
        rule(r"^drivers/gpu/drm/radeon/mkregtable", "mkregtable", |c| {
            Ok(c.split(' ').nth(1).map(str::to_string).into_iter().collect())
        }),
        rule(r"^(.*/)?genheaders\b", "genheaders", parse_noop),
        rule(r"^(.*/)?mkcpustr\s+>", "mkcpustr", parse_noop),
        rule(r"^(.*/)polgen\b", "polgen", parse_noop),
        rule(r"^make -f .*/arch/x86/Makefile\.postlink", "make", parse_noop),
        rule(r"^(.*/)?raid6/mktables\s+>", "mktables", parse_noop),
        rule(r"^(.*/)?objtool\b", "objtool", parse_noop),
        rule(r"^(.*/)?module/gen_test_kallsyms.sh", "gen_test_kallsyms.sh", parse_noop),
        rule(r"^(.*/)?gen_header.py", "gen_header.py", parse_gen_header),
        rule(r"^(.*/)?scripts/rustdoc_test_gen", "rustdoc_test_gen", parse_noop),
    ]
});

/// Commands allowed inside `( ... ) > file` and `{ ...; } > file`
static COMPOUND_RULES: LazyLock<Vec<CommandRule>> = LazyLock::new(|| {
    vec![
        rule(r"^dd\b", "dd", |c| {
            Ok(DD_INPUT_PATTERN
                .captures(c)
                .map(|caps| caps[1].to_string())
                .into_iter()
                .collect())
        }),
        rule(r"^cat.*?\|", "cat", |c| parse_cat(before(c, '|'))),
        rule(r"^cat\b[^|>]*$", "cat", parse_cat),
        rule(r"^echo\b", "echo", parse_noop),
        rule(r"^\S+=", "shell", parse_noop),
        rule(r"^printf\b", "printf", parse_noop),
        rule(r"^sed\b", "sed", parse_sed),
        rule(r"^(.*/)scripts/bin2c\s*<", "bin2c", |c| {
            let input = after(c, '<').trim();
            Ok(if input == "/dev/null" {
                Vec::new()
            } else {
                vec![input.to_string()]
            })
        }),
        rule(r"^:$", "shell", parse_noop),
    ]
});

/// Result of extracting inputs from a saved command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Input paths in command order, as written in the command
    pub inputs: Vec<String>,
    /// Name of the tool that performs the build step, if recognised
    pub label: Option<String>,
    /// Single commands that could not be interpreted
    pub unrecognized: Vec<String>,
}

/// SavedCommandParser service for `savedcmd_` command lines
///
/// Splits the command text into single commands and matches each one
/// against a registry of known build tools. Commands that match no rule
/// are recorded as unrecognized and contribute no inputs; they never make
/// parsing fail.
pub struct SavedCommandParser;

impl SavedCommandParser {
    /// Extracts the input files referenced by a command line
    ///
    /// # Arguments
    /// * `commands` - The full command text of a `savedcmd_` line
    ///
    /// # Returns
    /// ParsedCommand with inputs (trimmed, without trailing `/`), the tool
    /// label and the commands that were skipped
    pub fn parse(commands: &str) -> ParsedCommand {
        let mut parsed = ParsedCommand::default();
        let mut fallback_label = None;

        for part in split_commands(commands) {
            let command = match part {
                CommandPart::IfBlock { then_statement } => {
                    let nested = Self::parse(&then_statement);
                    if !nested.inputs.is_empty() {
                        tracing::debug!(
                            "Skipped inputs of if-block body '{}': conditional inputs are not tracked",
                            then_statement
                        );
                    }
                    continue;
                }
                CommandPart::Single(command) => command,
            };

            let Some(rule) = COMMAND_RULES.iter().find(|r| r.pattern.is_match(&command)) else {
                tracing::debug!("No parser matches command '{}'", command);
                parsed.unrecognized.push(command);
                continue;
            };

            match (rule.parse)(&command) {
                Ok(inputs) => {
                    parsed.inputs.extend(inputs);
                    if HOUSEKEEPING_LABELS.contains(&rule.label) {
                        fallback_label.get_or_insert(rule.label);
                    } else if parsed.label.is_none() {
                        parsed.label = Some(rule.label.to_string());
                    }
                }
                Err(e) => {
                    tracing::debug!("Failed to parse command '{}': {}", command, e);
                    parsed.unrecognized.push(command);
                }
            }
        }

        if parsed.label.is_none() {
            parsed.label = fallback_label.map(str::to_string);
        }
        parsed.inputs = parsed
            .inputs
            .into_iter()
            .map(|input| input.trim().trim_end_matches('/').to_string())
            .filter(|input| !input.is_empty())
            .collect();
        parsed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CommandPart {
    Single(String),
    IfBlock { then_statement: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Positional(String),
    Option,
}

/// Splits a command line into words following POSIX shell quoting rules
fn shell_split(command: &str) -> Result<Vec<String>> {
    shlex::split(command).ok_or_else(|| anyhow!("Unbalanced quoting in command {}", command))
}

fn split_commands(commands: &str) -> Vec<CommandPart> {
    let mut parts = Vec::new();
    let mut remaining = unwrap_outer_parentheses(commands);

    loop {
        remaining = remaining.trim();
        if remaining.is_empty() {
            break;
        }

        if let Some(caps) = IF_BLOCK_PATTERN.captures(remaining) {
            let end = caps.get(0).map_or(remaining.len(), |m| m.end());
            parts.push(CommandPart::IfBlock {
                then_statement: caps[2].trim().to_string(),
            });
            remaining = remaining[end..].trim_start_matches([';', ' ', '\n']);
            continue;
        }

        match find_top_level_separator(remaining) {
            Some((position, length)) => {
                let command = remaining[..position].trim();
                if !command.is_empty() {
                    parts.push(CommandPart::Single(command.to_string()));
                }
                remaining = &remaining[position + length..];
            }
            None => {
                parts.push(CommandPart::Single(remaining.to_string()));
                break;
            }
        }
    }
    parts
}

fn parse_noop(_command: &str) -> Result<Vec<String>> {
    Ok(Vec::new())
}

fn parse_compound(command: &str) -> Result<Vec<String>> {
    let body = COMPOUND_BODY_PATTERN
        .captures(command)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| anyhow!("No inner commands found for compound command"))?;

    let mut inputs = Vec::new();
    for part in split_commands(&body) {
        let CommandPart::Single(inner) = part else {
            tracing::debug!("Skipped if-block inside compound command '{}'", command);
            continue;
        };
        let Some(rule) = COMPOUND_RULES.iter().find(|r| r.pattern.is_match(&inner)) else {
            tracing::debug!("No parser matches inner command '{}'", inner);
            continue;
        };
        match (rule.parse)(&inner) {
            Ok(found) => inputs.extend(found),
            Err(e) => tracing::debug!("Failed to parse inner command '{}': {}", inner, e),
        }
    }
    Ok(inputs)
}

fn parse_cat(command: &str) -> Result<Vec<String>> {
    Ok(positionals_only(command.trim())?.into_iter().skip(1).collect())
}

fn parse_sed(command: &str) -> Result<Vec<String>> {
    let words = shell_split(command)?;
    Ok(words
        .last()
        .filter(|input| input.as_str() != "/dev/null")
        .cloned()
        .into_iter()
        .collect())
}

fn parse_awk(command: &str) -> Result<Vec<String>> {
    Ok(positionals(&tokenize(command, &[])?)
        .into_iter()
        .skip(1)
        .collect())
}

/// Compile mode: the last `.c`/`.S` positional. Link mode: every `.o` file.
fn parse_compiler(command: &str) -> Result<Vec<String>> {
    let words = shell_split(command)?;
    if let Some(source) = words
        .iter()
        .rev()
        .find(|w| !w.starts_with('-') && (w.ends_with(".c") || w.ends_with(".S")))
    {
        return Ok(vec![source.clone()]);
    }
    Ok(words.into_iter().filter(|w| w.ends_with(".o")).collect())
}

fn parse_ld(command: &str) -> Result<Vec<String>> {
    const LD_FLAGS: &[&str] = &[
        "-shared",
        "--no-undefined",
        "--eh-frame-hdr",
        "-Bsymbolic",
        "-r",
        "--no-ld-generated-unwind-info",
        "--no-dynamic-linker",
        "-pie",
        "--whole-archive",
        "--no-whole-archive",
        "--start-group",
        "--end-group",
    ];
    Ok(positionals(&tokenize(command.trim(), LD_FLAGS)?)
        .into_iter()
        .skip(1)
        .collect())
}

fn parse_ar(command: &str) -> Result<Vec<String>> {
    let words = positionals_only(command)?;
    let flags = nth(&words, 1)?;
    // Without `r` nothing is added to the archive
    if !flags.contains('r') {
        return Ok(Vec::new());
    }
    Ok(words.into_iter().skip(3).collect())
}

fn parse_ar_piped_xargs(command: &str) -> Result<Vec<String>> {
    let words = positionals_only(before(command, '|').trim())?;
    let prefix = nth(&words, 1)?;
    let prefix = prefix.trim_end_matches(['%', 's', ' ']);
    Ok(words
        .iter()
        .skip(2)
        .map(|name| format!("{}{}", prefix, name))
        .collect())
}

fn parse_nm_piped(command: &str) -> Result<Vec<String>> {
    Ok(
        positionals(&tokenize(before(command, '|').trim(), &["p", "--defined-only"])?)
            .into_iter()
            .skip(1)
            .collect(),
    )
}

fn parse_objcopy(command: &str) -> Result<Vec<String>> {
    let words = positionals(&tokenize(command, &["-S", "-w"])?);
    if !(words.len() == 2 || words.len() == 3) {
        bail!(
            "Invalid objcopy command: expected 2 or 3 positional arguments, got {}",
            words.len()
        );
    }
    nth_positional(&words, 1)
}

fn parse_strip(command: &str) -> Result<Vec<String>> {
    Ok(positionals(&tokenize(command, &["--strip-debug"])?)
        .into_iter()
        .skip(1)
        .collect())
}

fn last_positional_with_suffix(command: &str, suffixes: &[&str]) -> Result<Vec<String>> {
    shell_split(command)?
        .into_iter()
        .rev()
        .find(|w| !w.starts_with('-') && suffixes.iter().any(|s| w.ends_with(s)))
        .map(|w| vec![w])
        .ok_or_else(|| anyhow!("Could not find {} input file", suffixes.join("/")))
}

fn parse_bindgen(command: &str) -> Result<Vec<String>> {
    Ok(shell_split(command)?
        .into_iter()
        .filter(|w| w.ends_with(".h"))
        .collect())
}

fn parse_perl(command: &str) -> Result<Vec<String>> {
    nth_positional(&positionals_only(command.trim())?, 1)
}

fn parse_relocs(command: &str) -> Result<Vec<String>> {
    // Only relocs runs redirected into a file produce an artifact
    if !command.contains('>') {
        return Ok(Vec::new());
    }
    Ok(shell_split(before(command, '>'))?.pop().into_iter().collect())
}

fn parse_dtc(command: &str) -> Result<Vec<String>> {
    let words = shell_split(command)?;
    let warning_flags: Vec<&str> = words
        .iter()
        .map(String::as_str)
        .filter(|w| w.starts_with("-Wno-"))
        .collect();
    nth_positional(&positionals(&tokenize(command, &warning_flags)?), 1)
}

fn parse_gen_header(command: &str) -> Result<Vec<String>> {
    let words = shell_split(command)?;
    words
        .iter()
        .position(|w| w == "--xml")
        .and_then(|i| words.get(i + 1))
        .map(|input| vec![input.clone()])
        .ok_or_else(|| anyhow!("Missing --xml input in command {}", command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(command: &str) -> Vec<String> {
        SavedCommandParser::parse(command).inputs
    }

    #[test]
    fn test_gcc_compile_extracts_source() {
        let parsed = SavedCommandParser::parse(
            "gcc -Wp,-MMD,init/.main.o.d -nostdinc -I./include -D__KERNEL__ -c -o init/main.o init/main.c",
        );
        assert_eq!(parsed.inputs, vec!["init/main.c"]);
        assert_eq!(parsed.label.as_deref(), Some("cc"));
        assert!(parsed.unrecognized.is_empty());
    }

    #[test]
    fn test_cross_compiler_link_mode_collects_objects() {
        assert_eq!(
            inputs("x86_64-linux-gnu-gcc -o a.out b.o c.o"),
            vec!["b.o", "c.o"]
        );
    }

    #[test]
    fn test_ld_positionals_are_inputs() {
        let parsed = SavedCommandParser::parse("ld -m elf_x86_64 -r -o built-in.o a.o b.o");
        assert_eq!(parsed.inputs, vec!["a.o", "b.o"]);
        assert_eq!(parsed.label.as_deref(), Some("ld"));
    }

    #[test]
    fn test_ar_with_response_file() {
        assert_eq!(
            inputs("rm -f vmlinux.a; ar cDPrST vmlinux.a @vmlinux.a.order"),
            vec!["@vmlinux.a.order"]
        );
        assert!(inputs("ar t vmlinux.a").is_empty());
    }

    #[test]
    fn test_label_skips_housekeeping_commands() {
        let parsed = SavedCommandParser::parse("rm -f lib.a; ar cDPrST lib.a a.o b.o");
        assert_eq!(parsed.label.as_deref(), Some("ar"));
        assert_eq!(parsed.inputs, vec!["a.o", "b.o"]);

        let parsed = SavedCommandParser::parse("mkdir -p include/generated");
        assert_eq!(parsed.label.as_deref(), Some("mkdir"));
        assert!(parsed.inputs.is_empty());
    }

    #[test]
    fn test_printf_xargs_ar() {
        assert_eq!(
            inputs("printf \"drivers/base/%s \" core.o bus.o | xargs ar cDPrST drivers/base/built-in.a"),
            vec!["drivers/base/core.o", "drivers/base/bus.o"]
        );
    }

    #[test]
    fn test_objcopy_input() {
        assert_eq!(
            inputs("objcopy -O binary -R .note -R .comment -S vmlinux arch/x86/boot/compressed/vmlinux.bin"),
            vec!["vmlinux"]
        );
    }

    #[test]
    fn test_link_vmlinux_uses_archive() {
        assert_eq!(
            inputs("scripts/link-vmlinux.sh \"ld\" \"-m elf_x86_64\" \"\""),
            vec!["vmlinux.a"]
        );
    }

    #[test]
    fn test_cat_redirect_and_sed() {
        assert_eq!(
            inputs("cat arch/x86/boot/setup.bin arch/x86/boot/vmlinux.bin > arch/x86/boot/bzImage"),
            vec!["arch/x86/boot/setup.bin", "arch/x86/boot/vmlinux.bin"]
        );
        assert_eq!(
            inputs("sed -e 's/foo/bar/' include/a.h > include/generated/a.h"),
            vec!["include/a.h"]
        );
    }

    #[test]
    fn test_compound_command() {
        assert_eq!(
            inputs("{ cat modules.order; echo kernel/extra.ko; } > modules.builtin"),
            vec!["modules.order"]
        );
    }

    #[test]
    fn test_if_block_inputs_are_skipped() {
        let parsed =
            SavedCommandParser::parse("if [ -f x ]; then cat a.txt > b.txt; fi; touch done");
        assert!(parsed.inputs.is_empty());
        assert!(parsed.unrecognized.is_empty());
    }

    #[test]
    fn test_unknown_command_is_opaque() {
        let parsed = SavedCommandParser::parse("frobnicate --all vmlinux");
        assert!(parsed.inputs.is_empty());
        assert!(parsed.label.is_none());
        assert_eq!(parsed.unrecognized, vec!["frobnicate --all vmlinux"]);
    }

    #[test]
    fn test_syscall_scripts() {
        assert_eq!(
            inputs("sh ./scripts/syscallhdr.sh --abis common,64 --emit-nr arch/x86/entry/syscalls/syscall_64.tbl arch/x86/include/generated/uapi/asm/unistd_64.h"),
            vec!["arch/x86/entry/syscalls/syscall_64.tbl"]
        );
    }

    #[test]
    fn test_parentheses_are_unwrapped_and_trailing_slash_trimmed() {
        assert_eq!(inputs("(ld -o out dir/)"), vec!["dir"]);
    }

    #[test]
    fn test_shell_split_quoting() {
        assert_eq!(
            shell_split(r#"echo 'a b' "c \"d\"" e\ f"#).unwrap(),
            vec!["echo", "a b", "c \"d\"", "e f"]
        );
        assert!(shell_split("echo 'open").is_err());
    }

    #[test]
    fn test_split_commands_respects_quotes() {
        let parts = split_commands("echo 'a; b' && rm x; touch y");
        assert_eq!(
            parts,
            vec![
                CommandPart::Single("echo 'a; b'".to_string()),
                CommandPart::Single("rm x".to_string()),
                CommandPart::Single("touch y".to_string()),
            ]
        );
    }
}
