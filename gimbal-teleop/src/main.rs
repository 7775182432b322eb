use anyhow::{Context, Result};
use clap::Parser;
use gimbal_teleop::config::Target;
use gimbal_teleop::gimbal_control::GimbalController;
use gimbal_teleop::http_client::HttpTransport;
use gimbal_teleop::key_input::PlatformKeySource;
use gimbal_teleop::{cli, session};
use std::io::Write;

fn main() -> Result<()> {
    init_logger();
    let args = cli::Args::parse();
    let target = Target::from_args(&args)?;
    let transport = HttpTransport::new(&target)?;

    session::print_legend();
    let mut controller = GimbalController::connect(transport, target.endpoints());
    controller.sync_device();

    let mut keys = PlatformKeySource::open().context("keyboard input unavailable")?;
    session::run(&mut controller, &mut keys, target.poll_interval());
    Ok(())
}

fn init_logger() {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");
    env_logger::Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        })
        .init();
}
