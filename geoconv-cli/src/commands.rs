use std::path::Path;

use clap::ArgMatches;
use geoconv_core::{EnuCoord, GaussCoord, LlaCoord, Origin, SensorPolar};
use log::{debug, info};

use crate::config::Config;
use crate::error::{CliError, Result};

/// Resolve the effective configuration: file first, then command-line flags
pub fn resolve_config(matches: &ArgMatches) -> Result<Config> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::from_file(Path::new(path))?,
        None => Config::default(),
    };

    if let Some(origin) = matches.get_one::<String>("origin") {
        config.origin = parse_origin(origin)?;
    }
    if let Some(name) = matches.get_one::<String>("ellipsoid") {
        config.ellipsoid = name.parse()?;
    }
    if let Some(width) = matches.get_one::<String>("zone-width") {
        config.zone_width = width.parse()?;
    }
    if let Some(precision) = matches.get_one::<usize>("precision") {
        config.precision = *precision;
    }

    debug!("Effective config: {:?}", config);
    Ok(config)
}

fn parse_origin(value: &str) -> Result<Origin> {
    let parts = value
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f64>().map_err(|_| {
                CliError::Argument(format!("origin component '{part}' is not a number"))
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    match parts.as_slice() {
        [lat, lon] => Ok(Origin::new(*lat, *lon, 0.0)),
        [lat, lon, alt] => Ok(Origin::new(*lat, *lon, *alt)),
        _ => Err(CliError::Argument(format!(
            "origin '{value}' must be 'lat,lon' or 'lat,lon,alt'"
        ))),
    }
}

fn number(matches: &ArgMatches, name: &str) -> Result<f64> {
    matches
        .get_one::<f64>(name)
        .copied()
        .ok_or_else(|| CliError::Argument(format!("missing value for {name}")))
}

fn enu_args(matches: &ArgMatches) -> Result<EnuCoord> {
    Ok(EnuCoord::new(
        number(matches, "east")?,
        number(matches, "north")?,
        number(matches, "up")?,
    ))
}

fn format_values(values: &[f64], precision: usize) -> String {
    values
        .iter()
        .map(|v| format!("{v:.precision$}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run one subcommand and return the line to print
pub fn run(matches: &ArgMatches) -> Result<String> {
    let config = resolve_config(matches)?;
    let precision = config.precision;

    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| CliError::Argument("no subcommand given".to_string()))?;

    // The sensor frame needs no origin or ellipsoid
    if name == "polar" {
        let polar = SensorPolar::new(
            number(sub, "azimuth")?,
            number(sub, "elevation")?,
            number(sub, "range")?,
        );
        let v = polar.to_cartesian()?;
        return Ok(format_values(&[v.x, v.y, v.z], precision));
    }

    info!(
        "{} with origin ({}, {}, {}) on {} with {}° zones",
        name,
        config.origin.lat,
        config.origin.lon,
        config.origin.alt,
        config.ellipsoid,
        config.zone_width
    );
    let converter = config.converter()?;

    let values = match name {
        "enu-to-wgs84" => {
            let lla = converter.enu_to_wgs84(&enu_args(sub)?)?;
            vec![lla.lon, lla.lat, lla.alt]
        }
        "wgs84-to-enu" => {
            let lla = LlaCoord::new(number(sub, "lat")?, number(sub, "lon")?, number(sub, "alt")?);
            let enu = converter.wgs84_to_enu(&lla)?;
            vec![enu.east, enu.north, enu.up]
        }
        "wgs84-to-gauss" => {
            let gauss = converter.wgs84_to_gauss(number(sub, "lon")?, number(sub, "lat")?)?;
            vec![gauss.x_with_zone, gauss.y, gauss.central_meridian]
        }
        "gauss-to-wgs84" => {
            let central_meridian = sub.get_one::<f64>("central-meridian").copied();
            let (lon, lat) =
                converter.gauss_to_wgs84(number(sub, "x")?, number(sub, "y")?, central_meridian)?;
            vec![lon, lat]
        }
        "gauss-to-enu" => {
            let gauss = GaussCoord::new(
                number(sub, "x")?,
                number(sub, "y")?,
                number(sub, "central-meridian")?,
            );
            let enu = converter.gauss_to_enu(&gauss)?;
            vec![enu.east, enu.north, enu.up]
        }
        "enu-to-gauss" => {
            let gauss = converter.enu_to_gauss(&enu_args(sub)?)?;
            vec![gauss.x_with_zone, gauss.y, gauss.central_meridian]
        }
        other => return Err(CliError::Argument(format!("unknown subcommand {other}"))),
    };

    Ok(format_values(&values, precision))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli;
    use geoconv_core::{Ellipsoid, ZoneWidth};
    use std::io::Write;

    fn run_args(args: &[&str]) -> Result<String> {
        let mut argv = vec!["geoconv"];
        argv.extend_from_slice(args);
        let matches = cli::build()
            .try_get_matches_from(argv)
            .map_err(|e| CliError::Argument(e.to_string()))?;
        run(&matches)
    }

    fn parse_line(line: &str) -> Vec<f64> {
        line.split_whitespace().map(|v| v.parse().unwrap()).collect()
    }

    #[test]
    fn test_enu_to_gauss_default_origin() {
        let line = run_args(&["enu-to-gauss", "100", "-160", "0", "-p", "4"]).unwrap();
        let values = parse_line(&line);
        assert!((values[0] - 20693523.4782).abs() < 1e-3);
        assert!((values[1] - 4050289.7359).abs() < 1e-3);
        assert_eq!(values[2], 117.0);
    }

    #[test]
    fn test_enu_to_wgs84_output_format() {
        let line = run_args(&["enu-to-wgs84", "10", "10", "0", "--precision", "7"]).unwrap();
        assert_eq!(line.split_whitespace().count(), 3);
        assert!(line.starts_with("119.1606966 36.5654224 "));
    }

    #[test]
    fn test_gauss_to_wgs84_with_central_meridian() {
        let line = run_args(&[
            "gauss-to-wgs84",
            "20500006.2584",
            "4048272.8532",
            "--central-meridian",
            "119.15978492",
            "-p",
            "9",
        ])
        .unwrap();
        let values = parse_line(&line);
        assert!((values[0] - 119.159854834).abs() < 1e-8);
        assert!((values[1] - 36.565318846).abs() < 1e-8);
    }

    #[test]
    fn test_gauss_to_wgs84_missing_zone() {
        let err = run_args(&["gauss-to-wgs84", "693429.6378", "4050457.7481"]).unwrap_err();
        assert!(matches!(err, CliError::Conversion(_)));
    }

    #[test]
    fn test_origin_override() {
        let line = run_args(&[
            "wgs84-to-enu",
            "121.4737",
            "31.2304",
            "4",
            "--origin",
            "31.2304,121.4737,4",
        ])
        .unwrap();
        for value in parse_line(&line) {
            assert!(value.abs() < 1e-6);
        }
    }

    #[test]
    fn test_negative_origin_override() {
        let line = run_args(&[
            "wgs84-to-enu",
            "-70.6693",
            "-33.4489",
            "0",
            "--origin",
            "-33.4489,-70.6693",
        ])
        .unwrap();
        for value in parse_line(&line) {
            assert!(value.abs() < 1e-6);
        }
    }

    #[test]
    fn test_polar_ignores_origin() {
        // Out-of-range origin latitude only matters to geodetic subcommands
        let line = run_args(&["polar", "0.7", "90.2", "43.0", "--origin", "95,119"]).unwrap();
        assert_eq!(parse_line(&line).len(), 3);
        assert!(run_args(&["enu-to-wgs84", "1", "1", "0", "--origin", "95,119"]).is_err());
    }

    #[test]
    fn test_polar() {
        let values = parse_line(&run_args(&["polar", "0.7", "90.2", "43.0"]).unwrap());
        assert!((values[0] - 42.996529).abs() < 1e-6);
        assert!((values[1] + 0.525328).abs() < 1e-6);
        assert!((values[2] + 0.150098).abs() < 1e-6);
    }

    #[test]
    fn test_config_file_then_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ellipsoid = \"CGCS2000\"\nzone_width = 3\nprecision = 2").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let matches = cli::build()
            .try_get_matches_from([
                "geoconv",
                "--config",
                &path,
                "--zone-width",
                "6",
                "wgs84-to-gauss",
                "119.2",
                "36.6",
            ])
            .unwrap();
        let config = resolve_config(&matches).unwrap();
        assert_eq!(config.ellipsoid, Ellipsoid::Cgcs2000);
        assert_eq!(config.zone_width, ZoneWidth::Six);
        assert_eq!(config.precision, 2);

        let line = run(&matches).unwrap();
        assert!(line.ends_with(" 117.00"));
    }

    #[test]
    fn test_bad_overrides() {
        assert!(matches!(
            run_args(&["enu-to-wgs84", "0", "0", "0", "--origin", "1,2,3,4"]).unwrap_err(),
            CliError::Argument(_)
        ));
        assert!(matches!(
            run_args(&["enu-to-wgs84", "0", "0", "0", "--ellipsoid", "clrk66"]).unwrap_err(),
            CliError::Conversion(_)
        ));
        assert!(matches!(
            run_args(&["enu-to-wgs84", "0", "0", "0", "--zone-width", "5"]).unwrap_err(),
            CliError::Conversion(_)
        ));
    }

    #[test]
    fn test_parse_origin() {
        assert_eq!(parse_origin("36.5, 119.1").unwrap(), Origin::new(36.5, 119.1, 0.0));
        assert_eq!(parse_origin("-1,-2,-3").unwrap(), Origin::new(-1.0, -2.0, -3.0));
        assert!(parse_origin("a,b,c").is_err());
        assert!(parse_origin("1").is_err());
    }

    #[test]
    fn test_format_values() {
        assert_eq!(format_values(&[1.0, -2.5, 3.14159], 2), "1.00 -2.50 3.14");
    }
}
