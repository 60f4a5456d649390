use crate::build::{BuildConfiguration, BuildProfile};
use std::ffi::OsString;
use std::fmt;

/// One compiler argument: a switch prefix such as `/out:` plus its value.
/// Values stay `OsString` so paths that are not valid UTF-8 reach argv intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerArg {
    prefix: &'static str,
    value: OsString,
}

impl CompilerArg {
    fn switch(prefix: &'static str, value: impl Into<OsString>) -> Self {
        Self {
            prefix,
            value: value.into(),
        }
    }

    fn flag(flag: &'static str) -> Self {
        Self::switch(flag, OsString::new())
    }

    fn positional(value: impl Into<OsString>) -> Self {
        Self::switch("", value)
    }

    fn needs_quotes(&self) -> bool {
        self.value.to_string_lossy().contains(' ')
    }

    /// Argument as written on a Windows command line, for display.
    pub fn quoted(&self) -> String {
        format!("{}{}", self.prefix, quote_if_needed(&self.value.to_string_lossy()))
    }

    /// Same as `quoted`, without going through UTF-8.
    pub fn quoted_os(&self) -> OsString {
        let mut arg = OsString::from(self.prefix);
        if self.needs_quotes() {
            arg.push("\"");
            arg.push(&self.value);
            arg.push("\"");
        } else {
            arg.push(&self.value);
        }
        arg
    }

    /// Argument as passed through an argv vector.
    pub fn raw(&self) -> OsString {
        let mut arg = OsString::from(self.prefix);
        arg.push(&self.value);
        arg
    }
}

/// Wraps `value` in double quotes when it contains a space. Nothing else is
/// escaped, so embedded quotes pass through untouched.
pub fn quote_if_needed(value: &str) -> String {
    if value.contains(' ') {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandLine {
    args: Vec<CompilerArg>,
}

impl CommandLine {
    pub fn quoted_args(&self) -> Vec<String> {
        self.args.iter().map(CompilerArg::quoted).collect()
    }

    pub fn raw_args(&self) -> Vec<OsString> {
        self.args.iter().map(CompilerArg::raw).collect()
    }

    /// The whole quoted line, as handed to `raw_arg` on Windows.
    pub fn quoted_line(&self) -> OsString {
        let mut line = OsString::new();
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                line.push(" ");
            }
            line.push(arg.quoted_os());
        }
        line
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.quoted_args().join(" "))
    }
}

/** Maps a resolved configuration to `csc` arguments
 *
 * # Argument Order
 * 1. `/out:<path>`
 * 2. `/target:exe` or `/target:library`
 * 3. `/platform:<platform>`
 * 4. Profile flags: release `/optimize+`; debug `/optimize-` `/debug+`
 *    `/debug:full`; anything else adds nothing
 * 5. `/reference:<ref>` for each reference
 * 6. Each source file
 *
 * The mapping is pure. A configuration the compiler would reject still
 * produces a command line; the compiler reports the problem.
 */
pub struct CommandSynthesizer;

impl CommandSynthesizer {
    pub fn synthesize(config: &BuildConfiguration) -> CommandLine {
        let mut args = vec![
            CompilerArg::switch("/out:", config.full_output_path()),
            CompilerArg::switch("/target:", config.output_kind.target()),
            CompilerArg::switch("/platform:", config.platform.as_str()),
        ];

        // Profile flags sit between the fixed switches and the references
        match config.build_profile {
            BuildProfile::Release => args.push(CompilerArg::flag("/optimize+")),
            BuildProfile::Debug => {
                args.push(CompilerArg::flag("/optimize-"));
                args.push(CompilerArg::flag("/debug+"));
                args.push(CompilerArg::flag("/debug:full"));
            }
            BuildProfile::Other(_) => {}
        }

        args.extend(
            config
                .references()
                .iter()
                .map(|reference| CompilerArg::switch("/reference:", reference.as_str())),
        );

        args.extend(
            config
                .source_files()
                .iter()
                .map(|source| CompilerArg::positional(source.as_os_str())),
        );

        CommandLine { args }
    }
}
