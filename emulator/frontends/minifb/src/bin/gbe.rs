use gbe_systems_gbhw::{build_gbhw, ExportNames, GbhwOptions};

fn main() {
    let matches = gbe_minifb::new("gbe").get_matches();

    let result = gbe_minifb::run(matches, |matches| {
        let mut options = GbhwOptions {
            emulator: gbe_minifb::emulator_options(matches),
            ..Default::default()
        };
        if let Some(filename) = matches.get_one::<String>("core") {
            options.core = filename.to_string();
        }
        if let Some(prefix) = matches.get_one::<String>("symbol-prefix") {
            options.exports = ExportNames::with_prefix(prefix);
        }
        build_gbhw(options)
    });

    if let Err(err) = result {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
