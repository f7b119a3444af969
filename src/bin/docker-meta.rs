use clap::Parser;
use docker_meta::commands::{DockerMetaArgs, DockerMetaCommand};
use docker_meta_utils::logging::Logger;

fn main() {
    let mut args = DockerMetaArgs::parse();

    Logger::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();

    log::trace!("Parsed arguments: {args:#?}");

    args.run();
}
