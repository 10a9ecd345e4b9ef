#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::process::ExitCode;
    use std::sync::Arc;

    use clap::Parser;
    use glam::Vec3;
    use ragdoll_ik::ik::{Skeleton, SkeletonDefinition};
    use ragdoll_ik::interaction::{MoveRequest, PlotSession, PoseSession};
    use ragdoll_ik::{ConfigError, GridBox, Provider, RequestError, SolverConfig};

    /// Pose a skeleton from the command line and print the result as JSON.
    #[derive(Debug, Parser)]
    #[command(name = "ragdoll-demo", version)]
    struct Args {
        /// Skeleton definition JSON; the built-in humanoid when omitted
        #[arg(short, long)]
        skeleton: Option<PathBuf>,

        /// Relaxation iterations per move
        #[arg(short, long, default_value_t = ragdoll_ik::ik::DEFAULT_ITERATIONS)]
        iterations: u32,

        /// Tool-call JSON file applied after the moves, snapped to the default grid
        #[arg(long)]
        tool_calls: Option<PathBuf>,

        /// Apply the tool calls to a free point set instead of the skeleton
        #[arg(long, requires = "tool_calls")]
        plot: bool,

        /// Print the `plot` tool definition for `openai` or `claude` and exit
        #[arg(long, value_parser = parse_provider)]
        print_tool: Option<Provider>,

        /// Moves applied in order, as `joint=x,y,z`
        #[arg(value_parser = parse_move)]
        moves: Vec<MoveRequest>,
    }

    fn parse_move(s: &str) -> Result<MoveRequest, String> {
        let (joint, coords) = s
            .split_once('=')
            .ok_or_else(|| format!("expected joint=x,y,z, got `{s}`"))?;
        let values = coords
            .split(',')
            .map(|v| v.trim().parse::<f32>().map_err(|e| format!("`{v}`: {e}")))
            .collect::<Result<Vec<_>, _>>()?;
        match values.as_slice() {
            [x, y, z] => Ok(MoveRequest::new(joint, Vec3::new(*x, *y, *z))),
            _ => Err(format!("expected three coordinates, got {}", values.len())),
        }
    }

    fn parse_provider(s: &str) -> Result<Provider, String> {
        serde_json::from_value(serde_json::Value::String(s.to_owned()))
            .map_err(|_| format!("unknown provider `{s}`, expected openai or claude"))
    }

    #[derive(Debug, thiserror::Error)]
    enum DemoError {
        #[error(transparent)]
        Config(#[from] ConfigError),
        #[error(transparent)]
        Request(#[from] RequestError),
        #[error("{0}")]
        Io(#[from] std::io::Error),
    }

    fn to_json<T: serde::Serialize>(value: &T) -> Result<String, DemoError> {
        Ok(serde_json::to_string_pretty(value).map_err(ConfigError::from)?)
    }

    fn run_plot(path: &std::path::Path) -> Result<(), DemoError> {
        let json = std::fs::read_to_string(path)?;
        let mut session = PlotSession::default();
        let points = session.apply_tool_calls(&json)?;
        let points: Vec<[f32; 3]> = points.iter().map(|p| p.to_array()).collect();
        println!("{}", to_json(&points)?);
        Ok(())
    }

    fn run(args: Args) -> Result<(), DemoError> {
        if args.plot {
            if let Some(path) = &args.tool_calls {
                return run_plot(path);
            }
        }

        let definition = match &args.skeleton {
            Some(path) => SkeletonDefinition::from_path(path)?,
            None => SkeletonDefinition::humanoid(),
        };
        let skeleton = Arc::new(Skeleton::from_definition(&definition)?);
        let config = SolverConfig::new(args.iterations)?;

        let mut session = PoseSession::new(skeleton.clone())
            .with_config(config)
            .with_grid(GridBox::default());

        if let Some(provider) = args.print_tool {
            println!("{}", to_json(&session.tool_definition(provider))?);
            return Ok(());
        }

        for request in &args.moves {
            session.move_joint(request)?;
            log::info!("moved {} to {}", request.joint, request.target);
        }

        if let Some(path) = &args.tool_calls {
            let json = std::fs::read_to_string(path)?;
            session.apply_tool_calls(&json)?;
        }

        let pose = session.pose();
        log::info!(
            "max bone length error {:.2e}, max displacement from rest {:.3}",
            skeleton.max_length_error(pose),
            pose.max_displacement(&skeleton.rest_pose())
        );

        println!("{}", to_json(&skeleton.named_pose(pose))?);
        Ok(())
    }

    pub fn main() -> ExitCode {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        match run(Args::parse()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                log::error!("{err}");
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
