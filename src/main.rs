use flame;
use std::error::Error;
use std::fs::File;

use log::info;

use gemm_plot::{chart, cli, parse};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let arguments = cli::cli();
    let (input, output) = match (arguments.inputpath, arguments.outputpath) {
        (Some(input), Some(output)) => (input, output),
        // Nothing to do without both paths; by contract that is not an error.
        _ => return Ok(()),
    };

    if arguments.flamegraph {
        flame::start("main");
    }

    let series = parse::parse(&input)?;
    info!(
        "parsed {} series ({} points) from {}",
        series.len(),
        series.values().map(Vec::len).sum::<usize>(),
        input
    );
    chart::render(&series, &output)?;

    if arguments.flamegraph {
        flame::end("main");
        flame::dump_html(File::create("flamegraph.html")?)?;
    }

    Ok(())
}
