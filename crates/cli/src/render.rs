//! Output rendering for resolutions and rule listings.

use std::io::{self, Write};

use resolver::Resolution;
use rules::RuleTable;

/// Output format selected with `--format`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputFormat {
    /// C preprocessor lines, one `#define` per active flag.
    #[default]
    Defines,
    /// One flag name per line.
    List,
    /// The full resolution as a JSON object.
    Json,
}

impl OutputFormat {
    /// Names accepted by `--format`.
    pub const NAMES: [&'static str; 3] = ["defines", "list", "json"];

    /// Parses a `--format` value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "defines" => Some(Self::Defines),
            "list" => Some(Self::List),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Rendering switches derived from the command line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RenderOptions {
    /// Selected format.
    pub format: OutputFormat,
    /// Include inactive flags.
    pub all: bool,
    /// Annotate each active flag with where it came from.
    pub explain: bool,
}

/// Writes `resolution` to `out` in the requested format.
///
/// JSON output always carries every flag and the provenance of derived
/// flags, so `all` and `explain` only affect the text formats.
pub fn render_resolution<W: Write>(
    out: &mut W,
    table: &RuleTable,
    resolution: &Resolution,
    options: RenderOptions,
) -> io::Result<()> {
    match options.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, resolution)?;
            writeln!(out)
        }
        OutputFormat::Defines | OutputFormat::List => {
            for (name, active) in resolution.flags().iter() {
                if !active && !options.all {
                    continue;
                }
                let line = text_line(options, name, active);
                let origin = if options.explain && active {
                    origin(table, resolution, name)
                } else {
                    None
                };
                match (origin, options.format) {
                    (Some(origin), OutputFormat::Defines) => {
                        writeln!(out, "{line} /* {origin} */")?;
                    }
                    (Some(origin), _) => writeln!(out, "{line}  # {origin}")?,
                    (None, _) => writeln!(out, "{line}")?,
                }
            }
            Ok(())
        }
    }
}

fn text_line(options: RenderOptions, name: &str, active: bool) -> String {
    match options.format {
        OutputFormat::Defines if active => format!("#define {name}"),
        OutputFormat::Defines => format!("/* #undef {name} */"),
        _ if options.all => format!("{name}={}", if active { "on" } else { "off" }),
        _ => name.to_owned(),
    }
}

fn origin(table: &RuleTable, resolution: &Resolution, name: &str) -> Option<String> {
    if resolution.is_explicit(name) {
        return Some("explicit".to_owned());
    }
    let index = resolution.derived_by(name)?;
    let rule = table.rule(index)?;
    Some(format!(
        "rule #{index} ({}): {}",
        rule.reason(),
        rule.predicate()
    ))
}

/// Lists every rule of `table` in declaration order, with its note.
pub fn render_rules<W: Write>(out: &mut W, table: &RuleTable) -> io::Result<()> {
    for (index, rule) in table.rules().iter().enumerate() {
        writeln!(out, "#{index} [{}] {rule}", rule.reason())?;
        if let Some(note) = rule.note() {
            writeln!(out, "    {note}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use resolver::Resolver;
    use rules::{Predicate, Rule, RuleReason, Vocabulary};

    use super::*;

    fn table() -> RuleTable {
        RuleTable::new(
            Vocabulary::new(["A", "B", "C"]).expect("vocabulary"),
            [Rule::new("B", Predicate::any(["A", "C"]))
                .with_reason(RuleReason::Superset)
                .with_note("A is a superset of B")],
        )
        .expect("table")
    }

    fn render(options: RenderOptions) -> String {
        let table = table();
        let resolution = Resolver::new(&table)
            .resolve_enabled(["A"])
            .expect("resolves");
        let mut out = Vec::new();
        render_resolution(&mut out, &table, &resolution, options).expect("renders");
        String::from_utf8(out).expect("utf-8")
    }

    #[test]
    fn format_names_round_trip() {
        for name in OutputFormat::NAMES {
            assert!(OutputFormat::from_name(name).is_some(), "{name}");
        }
        assert_eq!(OutputFormat::from_name("yaml"), None);
    }

    #[test]
    fn defines_list_active_flags() {
        assert_eq!(
            render(RenderOptions::default()),
            "#define A\n#define B\n"
        );
    }

    #[test]
    fn defines_with_all_mark_inactive_flags() {
        let options = RenderOptions {
            all: true,
            ..RenderOptions::default()
        };
        assert_eq!(
            render(options),
            "#define A\n#define B\n/* #undef C */\n"
        );
    }

    #[test]
    fn defines_explain_origin() {
        let options = RenderOptions {
            explain: true,
            ..RenderOptions::default()
        };
        assert_eq!(
            render(options),
            "#define A /* explicit */\n#define B /* rule #0 (superset): (A || C) */\n"
        );
    }

    #[test]
    fn list_prints_names() {
        let options = RenderOptions {
            format: OutputFormat::List,
            ..RenderOptions::default()
        };
        assert_eq!(render(options), "A\nB\n");
    }

    #[test]
    fn list_with_all_prints_states() {
        let options = RenderOptions {
            format: OutputFormat::List,
            all: true,
            explain: true,
        };
        assert_eq!(
            render(options),
            "A=on  # explicit\nB=on  # rule #0 (superset): (A || C)\nC=off\n"
        );
    }

    #[test]
    fn json_carries_every_flag() {
        let options = RenderOptions {
            format: OutputFormat::Json,
            ..RenderOptions::default()
        };
        let value: serde_json::Value = serde_json::from_str(&render(options)).expect("json");
        assert_eq!(value["flags"]["C"], serde_json::Value::Bool(false));
        assert_eq!(value["derived_by"]["B"], serde_json::json!(0));
    }

    #[test]
    fn rules_listing_includes_notes() {
        let mut out = Vec::new();
        render_rules(&mut out, &table()).expect("renders");
        assert_eq!(
            String::from_utf8(out).expect("utf-8"),
            "#0 [superset] (A || C) => B\n    A is a superset of B\n"
        );
    }
}
