use clap::{Arg, ArgAction, Command, value_parser};

fn coordinate(name: &'static str, help: &'static str, index: usize) -> Arg {
    Arg::new(name)
        .help(help)
        .required(true)
        .index(index)
        .allow_negative_numbers(true)
        .value_parser(value_parser!(f64))
}

fn central_meridian(required: bool) -> Arg {
    Arg::new("central-meridian")
        .long("central-meridian")
        .help("Central meridian of the zone in degrees")
        .value_name("DEGREES")
        .allow_negative_numbers(true)
        .value_parser(value_parser!(f64))
        .required(required)
}

pub fn build() -> Command {
    Command::new("geoconv")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between WGS84, local ENU and Gauss-Krüger coordinates")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("TOML file with origin, ellipsoid and zone settings")
                .value_name("FILE")
                .global(true),
        )
        .arg(
            Arg::new("origin")
                .long("origin")
                .help("ENU origin as 'lat,lon,alt'")
                .value_name("LAT,LON,ALT")
                .allow_hyphen_values(true)
                .global(true),
        )
        .arg(
            Arg::new("ellipsoid")
                .long("ellipsoid")
                .help("Reference ellipsoid (WGS84, CGCS2000, Beijing54)")
                .value_name("NAME")
                .global(true),
        )
        .arg(
            Arg::new("zone-width")
                .long("zone-width")
                .help("Gauss-Krüger zone width in degrees (3 or 6)")
                .value_name("DEGREES")
                .global(true),
        )
        .arg(
            Arg::new("precision")
                .short('p')
                .long("precision")
                .help("Digits after the decimal point")
                .value_name("DIGITS")
                .value_parser(value_parser!(usize))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("enu-to-wgs84")
                .about("Local ENU offset to lon, lat, alt")
                .arg(coordinate("east", "East offset in meters", 1))
                .arg(coordinate("north", "North offset in meters", 2))
                .arg(coordinate("up", "Up offset in meters", 3)),
        )
        .subcommand(
            Command::new("wgs84-to-enu")
                .about("lon, lat, alt to a local ENU offset")
                .arg(coordinate("lon", "Longitude in degrees", 1))
                .arg(coordinate("lat", "Latitude in degrees", 2))
                .arg(coordinate("alt", "Height above the ellipsoid in meters", 3)),
        )
        .subcommand(
            Command::new("wgs84-to-gauss")
                .about("lon, lat to zoned Gauss-Krüger x, y and central meridian")
                .arg(coordinate("lon", "Longitude in degrees", 1))
                .arg(coordinate("lat", "Latitude in degrees", 2)),
        )
        .subcommand(
            Command::new("gauss-to-wgs84")
                .about("Zoned Gauss-Krüger x, y to lon, lat")
                .arg(coordinate("x", "Easting with zone prefix in meters", 1))
                .arg(coordinate("y", "Northing in meters", 2))
                .arg(central_meridian(false)),
        )
        .subcommand(
            Command::new("gauss-to-enu")
                .about("Zoned Gauss-Krüger x, y to a local ENU offset")
                .arg(coordinate("x", "Easting with zone prefix in meters", 1))
                .arg(coordinate("y", "Northing in meters", 2))
                .arg(central_meridian(true)),
        )
        .subcommand(
            Command::new("enu-to-gauss")
                .about("Local ENU offset to zoned Gauss-Krüger x, y and central meridian")
                .arg(coordinate("east", "East offset in meters", 1))
                .arg(coordinate("north", "North offset in meters", 2))
                .arg(coordinate("up", "Up offset in meters", 3)),
        )
        .subcommand(
            Command::new("polar")
                .about("Sensor azimuth, elevation, range to forward-left-up x, y, z")
                .arg(coordinate("azimuth", "Clockwise bearing in degrees", 1))
                .arg(coordinate("elevation", "Elevation reading in degrees, 90 is level", 2))
                .arg(coordinate("range", "Slant range in meters", 3)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_valid() {
        build().debug_assert();
    }

    #[test]
    fn test_negative_positionals() {
        let matches = build()
            .try_get_matches_from(["geoconv", "enu-to-wgs84", "100", "-160", "-2.5"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "enu-to-wgs84");
        assert_eq!(*sub.get_one::<f64>("north").unwrap(), -160.0);
        assert_eq!(*sub.get_one::<f64>("up").unwrap(), -2.5);
    }

    #[test]
    fn test_gauss_to_enu_requires_central_meridian() {
        let result =
            build().try_get_matches_from(["geoconv", "gauss-to-enu", "20500000", "4048000"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let matches = build()
            .try_get_matches_from([
                "geoconv",
                "wgs84-to-gauss",
                "119.16",
                "36.56",
                "--zone-width",
                "3",
                "-v",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<String>("zone-width").map(String::as_str), Some("3"));
        assert!(sub.get_flag("verbose"));
    }
}
