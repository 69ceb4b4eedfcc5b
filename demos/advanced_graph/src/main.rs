use std::process::ExitCode;

use denoise_builder::{run_denoise, Compositor, DenoiseConfig, DenoiseMode, Scene};
use denoise_graph::{Graph, NodeId, PortId};
use log::error;

/// CLI config.
struct AppConfig {
    mode: DenoiseMode,
    config_path: Option<String>,
    drop_outputs: Vec<&'static str>,
}

fn print_usage_and_exit() -> ! {
    eprintln!(
        "Usage:\n  denoise-demo-advanced-graph [--basic] [--config layout.json] [--drop SOCKET]...\n\n\
         Builds the denoise compositing graph against an in-memory scene and prints it.\n\
         --drop hides a pass socket (e.g. TransCol) to show a failed, rolled-back rebuild.\n\
         Set RUST_LOG=debug to trace every node and link.\n"
    );
    std::process::exit(2);
}

fn parse_args() -> AppConfig {
    let mut args = std::env::args().skip(1);
    let mut mode = DenoiseMode::Advanced;
    let mut config_path = None;
    let mut drop_outputs = Vec::new();

    while let Some(a) = args.next() {
        match a.as_str() {
            "--basic" => mode = DenoiseMode::Basic,
            "--config" => config_path = args.next(),
            "--drop" => match args.next().as_deref().and_then(known_socket) {
                Some(name) => drop_outputs.push(name),
                None => print_usage_and_exit(),
            },
            "--help" | "-h" => print_usage_and_exit(),
            _ => {
                eprintln!("Unknown arg: {a}");
                print_usage_and_exit();
            }
        }
    }

    AppConfig {
        mode,
        config_path,
        drop_outputs,
    }
}

fn known_socket(name: &str) -> Option<&'static str> {
    use denoise_core::passes::{DENOISING_ALBEDO, DENOISING_NORMAL, NOISY_IMAGE};
    [NOISY_IMAGE, DENOISING_NORMAL, DENOISING_ALBEDO]
        .into_iter()
        .chain(denoise_core::PASS_TABLE.iter().map(|(_, n)| *n))
        .find(|n| *n == name)
}

fn print_graph(g: &Graph) {
    println!("--- nodes ---");
    for n in g.nodes() {
        println!(
            "{:>3} {:<12} at ({:>7.1}, {:>7.1}){}",
            n.id.0,
            n.kind.name(),
            n.location.x,
            n.location.y,
            if n.hidden { " [collapsed]" } else { "" }
        );
    }
    println!("--- links ---");
    for e in g.edges() {
        let name = |id: NodeId, port: PortId| {
            g.node(id)
                .and_then(|n| n.ports.iter().find(|p| p.id == port))
                .map_or("?", |p| p.name)
        };
        println!(
            "{:>3}.{:<16} -> {:>3}.{}",
            e.from.node.0,
            name(e.from.node, e.from.port),
            e.to.node.0,
            name(e.to.node, e.to.port)
        );
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let app = parse_args();

    let config = match &app.config_path {
        Some(path) => match DenoiseConfig::from_json_path(path) {
            Ok(c) => c,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => DenoiseConfig::default(),
    };

    let mut scene = Scene::new().without_outputs(&app.drop_outputs);
    let status = run_denoise(&mut scene, app.mode, &config);
    print_graph(scene.graph());

    match status {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?} denoise failed: {e}", app.mode);
            ExitCode::FAILURE
        }
    }
}
