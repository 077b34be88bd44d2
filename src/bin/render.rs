//! Command-line entry point: picks a scene and an integrator, runs the
//! render loop, and writes a PNG.

use clap::{App, Arg};
use radiance::film::Image;
use radiance::integrator::{self, DirectRadianceIntegrator, PathRadianceIntegrator, RadianceIntegrator};
use radiance::sampler::IndependentSampler;
use radiance::scenes::cornell_box;
use radiance::Point2i;

fn main() {
    tracing_subscriber::fmt::init();

    let matches = App::new("render")
        .about("Renders a test scene with a Monte Carlo radiance integrator")
        .arg(
            Arg::with_name("integrator")
                .long("integrator")
                .takes_value(true)
                .possible_values(&["direct", "path"])
                .default_value("path"),
        )
        .arg(Arg::with_name("spp").long("spp").takes_value(true).default_value("64"))
        .arg(Arg::with_name("width").long("width").takes_value(true).default_value("400"))
        .arg(Arg::with_name("height").long("height").takes_value(true).default_value("400"))
        .arg(Arg::with_name("seed").long("seed").takes_value(true).default_value("0"))
        .arg(
            Arg::with_name("out")
                .long("out")
                .takes_value(true)
                .default_value("render.png"),
        )
        .get_matches();

    if let Err(err) = run(&matches) {
        tracing::error!(error = %err, "render failed");
        std::process::exit(1);
    }
}

fn run(matches: &clap::ArgMatches) -> anyhow::Result<()> {
    let width: i32 = matches.value_of("width").unwrap().parse()?;
    let height: i32 = matches.value_of("height").unwrap().parse()?;
    let spp: usize = matches.value_of("spp").unwrap().parse()?;
    let seed: u64 = matches.value_of("seed").unwrap().parse()?;
    let out = matches.value_of("out").unwrap();

    let scene = cornell_box(Point2i::new(width, height));
    let sampler = IndependentSampler::new(spp, seed);

    let integrator: Box<dyn RadianceIntegrator> = match matches.value_of("integrator").unwrap() {
        "direct" => Box::new(DirectRadianceIntegrator::default()),
        _ => Box::new(PathRadianceIntegrator::default()),
    };

    let mut image = Image::new(scene.camera.resolution());
    integrator::render(integrator.as_ref(), &scene, &sampler, &mut image)?;
    image.write_png(out)?;

    tracing::info!(path = out, "wrote render");
    Ok(())
}
