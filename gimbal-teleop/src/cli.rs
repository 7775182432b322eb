use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Drive an OBSBOT Tail gimbal from the keyboard over its HTTP API"
)]
pub struct Args {
    /// IP address or hostname of the camera
    #[arg(long, default_value = "192.168.1.146")]
    pub host: String,

    /// Port of the gimbal/camera/AI HTTP API
    #[arg(long, default_value_t = 27739)]
    pub api_port: u16,

    /// Base path of the gimbal/camera/AI HTTP API
    #[arg(long, default_value = "/obsbot/tail/ai")]
    pub api_path: String,

    /// Port of the focus endpoint
    #[arg(long, default_value_t = 80)]
    pub focus_port: u16,

    /// HTTP timeout in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Delay between keyboard polls in milliseconds
    #[arg(long, default_value_t = 50)]
    pub poll_interval_ms: u64,
}
