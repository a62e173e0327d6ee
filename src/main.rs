use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use zsearch::kernel::services::adapters::{
    build_runtime, get_settings_path, load_settings, ExtensionIconResolver, FsContentSource,
    FsEditApplier, LocalSearchProvider, MemoryEditorHost,
};
use zsearch::kernel::services::ports::EngineSettings;
use zsearch::kernel::{ResultSnapshot, SearchEngine};

const USAGE: &str = "usage: zsearch [--regex] [--case] [--word] [--ignored] [--json] \
[--include GLOB]... [--exclude GLOB]... [--max N] [--timeout SECS] \
[--replace TEXT [--preview | --apply]] TERM [ROOT...]";

#[derive(Debug, Default)]
struct Args {
    term: Option<String>,
    roots: Vec<PathBuf>,
    use_regex: bool,
    match_case: bool,
    whole_word: bool,
    include_ignored: bool,
    json: bool,
    include: Vec<String>,
    exclude: Vec<String>,
    max_results: Option<usize>,
    timeout_secs: u64,
    replace: Option<String>,
    preview: bool,
    apply: bool,
}

fn parse_args(mut it: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut args = Args {
        timeout_secs: 60,
        ..Args::default()
    };
    while let Some(arg) = it.next() {
        let mut next_value = |flag: &str| it.next().ok_or_else(|| format!("{} needs a value", flag));
        match arg.as_str() {
            "--regex" => args.use_regex = true,
            "--case" => args.match_case = true,
            "--word" => args.whole_word = true,
            "--ignored" => args.include_ignored = true,
            "--json" => args.json = true,
            "--preview" => args.preview = true,
            "--apply" => args.apply = true,
            "--include" => args.include.push(next_value("--include")?),
            "--exclude" => args.exclude.push(next_value("--exclude")?),
            "--replace" => args.replace = Some(next_value("--replace")?),
            "--max" => {
                let n = next_value("--max")?;
                args.max_results = Some(n.parse().map_err(|_| format!("bad --max: {}", n))?);
            }
            "--timeout" => {
                let n = next_value("--timeout")?;
                args.timeout_secs = n.parse().map_err(|_| format!("bad --timeout: {}", n))?;
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown flag {}", flag)),
            value if args.term.is_none() => args.term = Some(value.to_string()),
            value => args.roots.push(PathBuf::from(value)),
        }
    }
    if (args.preview || args.apply) && args.replace.is_none() {
        return Err("--preview/--apply need --replace".to_string());
    }
    Ok(args)
}

fn print_tree(snapshot: &ResultSnapshot) {
    for root in &snapshot.roots {
        let indent = if root.visible {
            println!("{} ({})", root.name, root.path.display());
            "  "
        } else {
            ""
        };
        for file in &root.files {
            let dir = if file.relative_dir.is_empty() {
                String::new()
            } else {
                format!(" {}", file.relative_dir)
            };
            println!("{}{}{} [{}]", indent, file.name, dir, file.matches.len());
            if !file.expanded {
                continue;
            }
            for m in &file.matches {
                println!("{}  {}:{}  {}", indent, m.line, m.character, m.line_text.trim());
            }
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let settings = match get_settings_path() {
        Some(path) => load_settings(&path).map_err(|e| e.to_string())?,
        None => EngineSettings::default(),
    };

    let roots = if args.roots.is_empty() {
        vec![std::env::current_dir().map_err(|e| e.to_string())?]
    } else {
        args.roots
            .iter()
            .map(|r| r.canonicalize().unwrap_or_else(|_| r.clone()))
            .collect()
    };

    let mut options = settings.default_options.clone();
    options.roots = roots;
    options.use_regex |= args.use_regex;
    options.match_case |= args.match_case;
    options.match_whole_word |= args.whole_word;
    options.include_ignored |= args.include_ignored;
    options.include.extend(args.include);
    options.exclude.extend(args.exclude);
    if args.max_results.is_some() {
        options.max_results = args.max_results;
    }

    let runtime = build_runtime().map_err(|e| e.to_string())?;
    let host = MemoryEditorHost::new();
    let mut engine = SearchEngine::new(
        settings,
        Box::new(LocalSearchProvider::new(runtime.handle().clone())),
        Box::new(FsContentSource),
        Box::new(FsEditApplier),
        Box::new(host),
    )
    .with_icon_resolver(Box::new(ExtensionIconResolver));

    let term = args.term.unwrap_or_default();
    engine.search(&term, options);
    if !engine.pump_until_done(Duration::from_secs(args.timeout_secs)) {
        engine.cancel();
        eprintln!("search timed out, showing partial results");
    }

    if let Some(replacement) = args.replace {
        engine.set_replace_term(replacement);
        if args.preview {
            for file in engine.snapshot().roots.iter().flat_map(|r| &r.files) {
                match engine.preview(file.id) {
                    Ok(text) => {
                        println!("==> {} <==", file.path.display());
                        print!("{}", text);
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }
            return Ok(());
        }
        if args.apply {
            let summary = engine.replace_all();
            for (path, e) in &summary.failures {
                eprintln!("{}: {}", path.display(), e);
            }
            println!(
                "replaced {} matches in {} files",
                summary.matches, summary.files
            );
            return Ok(());
        }
    }

    let snapshot = engine.snapshot();
    if args.json {
        let json = serde_json::to_string_pretty(&snapshot).map_err(|e| e.to_string())?;
        println!("{}", json);
    } else {
        print_tree(&snapshot);
        println!(
            "{} results in {} files",
            engine.match_count(),
            engine.file_count()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let _logging = zsearch::logging::init(true);

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            tracing::error!(error = %msg, "zsearch failed");
            eprintln!("{}", msg);
            ExitCode::FAILURE
        }
    }
}
