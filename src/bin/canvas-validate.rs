use canvas_render::{
    parse_tree, parse_tree_yaml, validate_tree, CanvasError, ComponentRegistry, Node,
    RenderConfig, Renderer, TreeIssue,
};
use std::env;
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match Options::parse(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            print_usage();
            process::exit(1);
        }
    };

    let config = match load_config(options.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", e);
            process::exit(1);
        }
    };

    let registry = match ComponentRegistry::with_builtin_widgets() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("✗ {}", e);
            process::exit(1);
        }
    };
    let renderer = Renderer::with_config(&registry, config);

    let mut exit_code = 0;
    for file_path in &options.files {
        let tree = match load_tree(file_path) {
            Ok(tree) => tree,
            Err(e) => {
                eprintln!("✗ {} could not be loaded:", file_path);
                eprintln!("    {}", e);
                exit_code = 1;
                continue;
            }
        };

        let issues = validate_tree(&tree, &registry);
        if issues.is_empty() {
            println!("✓ {} is valid", file_path);
        } else {
            eprintln!("✗ {} has errors:", file_path);
            print_issues(&issues);
            exit_code = 1;
        }

        if options.render {
            println!("{}", renderer.render(&tree).to_html());
        }
    }

    process::exit(exit_code);
}

struct Options {
    render: bool,
    config: Option<String>,
    files: Vec<String>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut options = Options {
            render: false,
            config: None,
            files: Vec::new(),
        };

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--render" => options.render = true,
                "--config" => {
                    let path = iter
                        .next()
                        .ok_or_else(|| "--config requires a file path".to_string())?;
                    options.config = Some(path.clone());
                }
                flag if flag.starts_with("--") => {
                    return Err(format!("Unknown option '{}'", flag));
                }
                file => options.files.push(file.to_string()),
            }
        }

        if options.files.is_empty() {
            return Err("No input files".to_string());
        }
        Ok(options)
    }
}

fn print_usage() {
    eprintln!("Usage: canvas-validate [--render] [--config config.yaml] <tree.json|tree.yaml>...");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  canvas-validate dashboard.json");
    eprintln!("  canvas-validate --render fixtures/*.json");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  CANVAS_MAX_DEPTH  override the maximum nesting depth");
    eprintln!("  RUST_LOG          log filter (default: warn)");
}

fn load_config(path: Option<&str>) -> Result<RenderConfig, CanvasError> {
    let config = match path {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    config.with_env_overrides()
}

fn load_tree(path: &str) -> Result<Node, CanvasError> {
    let content = fs::read_to_string(path)
        .map_err(|e| CanvasError::Io(format!("Failed to read file: {}", e)))?;

    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => parse_tree_yaml(&content),
        _ => parse_tree(&content),
    }
}

fn print_issues(issues: &[TreeIssue]) {
    for issue in issues {
        let location = if issue.path.is_empty() {
            "root".to_string()
        } else {
            issue
                .path
                .iter()
                .map(|i| format!("child {}", i))
                .collect::<Vec<_>>()
                .join(" > ")
        };
        match &issue.error {
            CanvasError::UnknownComponent { component } => {
                eprintln!("  Unknown component '{}' at {}", component, location);
                eprintln!("    Not registered; it will render as a fallback");
            }
            CanvasError::MissingComponent
            | CanvasError::MissingProps { .. }
            | CanvasError::MalformedField { .. } => {
                eprintln!("  Structural error at {}:", location);
                eprintln!("    {}", issue.error);
            }
            e => {
                eprintln!("  {} ({})", e, location);
            }
        }
    }
}
