use clap::{command, Arg, ArgAction};

#[derive(Debug)]
pub struct CliArgs {
    pub inputpath: Option<String>,
    pub outputpath: Option<String>,
    pub flamegraph: bool,
}

pub fn cli() -> CliArgs {
    let arguments = command!("Gemm Plot")
        .version("1.0")
        .about("Plots GFLOPs/s over matrix size from a GEMM benchmark log. Give the log file as first argument, the image file as second argument.")
        .arg(
            Arg::new("input")
                .help("Specify the benchmark log to read.")
                // Missing paths mean a silent no-op, not a usage error.
                .required(false)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .help("Specify the image file to write.")
                .required(false)
                .index(2),
        )
        .arg(
            Arg::new("flamegraph")
                .help("Specify whether to create a flamegraph")
                .long("flamegraph")
                .short('f')
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    return CliArgs {
        inputpath: arguments.get_one::<String>("input").cloned(),
        outputpath: arguments.get_one::<String>("output").cloned(),
        flamegraph: arguments.get_flag("flamegraph"),
    };
}
