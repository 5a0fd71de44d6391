//! Interactive viewer for the demo contour: a yellow point cloud over a
//! reference grid, with the triangulated interior drawn as a textured
//! mesh.

use anyhow::Result;
use clap::Parser;
use polyview_core::Point2f;
use polyview_viewer::{ContourViewer, ViewerConfig};

const DEFAULT_TEXTURE_URL: &str = "https://i.ibb.co/2k3BbfS/test.png";

#[derive(Parser)]
#[command(about = "Interactive viewer for a triangulated ground-plane contour")]
struct Args {
    /// Initial window width
    #[arg(long, default_value_t = 1200.0)]
    width: f64,

    /// Initial window height
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Texture image URL applied to the mesh
    #[arg(long, default_value = DEFAULT_TEXTURE_URL)]
    texture_url: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let contour = vec![
        Point2f::new(154.0, 0.0),
        Point2f::new(140.0, 10.0),
        Point2f::new(150.0, 40.0),
    ];

    let config = ViewerConfig {
        width: args.width,
        height: args.height,
        texture_url: Some(args.texture_url),
        ..ViewerConfig::default()
    };

    ContourViewer::new(contour, config).run()?;
    Ok(())
}
