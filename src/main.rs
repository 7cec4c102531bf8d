// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io;

use svgmicro::*;

fn main() {
    if let Err(e) = process() {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

fn process() -> Result<(), String> {
    let args = match collect_args() {
        Ok(args) => args,
        Err(e) => {
            println!("{}", HELP);
            return Err(e.to_string());
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            if args.verbose {
                log::set_max_level(log::LevelFilter::Debug);
            } else {
                log::set_max_level(log::LevelFilter::Warn);
            }
        }
    }

    let h = EventPrinter;
    match args.kind {
        Kind::Path => run(PathParser::with_handler(h), &args),
        Kind::Points => run(PointsParser::with_handler(h), &args),
        Kind::Transform => run(TransformListParser::with_handler(h), &args),
        Kind::Length => run(LengthParser::with_handler(h), &args),
        Kind::LengthList => run(LengthListParser::with_handler(h), &args),
        Kind::Angle => run(AngleParser::with_handler(h), &args),
        Kind::Clock => run(ClockParser::with_handler(h), &args),
        Kind::AspectRatio => run(PreserveAspectRatioParser::with_handler(h), &args),
        Kind::Fragment => run(FragmentIdentifierParser::with_handler(h), &args),
    }
}

const HELP: &str = "\
svgmicro parses an SVG attribute value and prints its events.

USAGE:
  svgmicro [OPTIONS] <value>  # from an argument
  svgmicro [OPTIONS] -        # from stdin

  svgmicro 'M 10 20 L 30 40 Z'
  svgmicro --kind transform 'translate(10,20) rotate(45)'
  echo 'svgView(viewBox(0,0,10,10))' | svgmicro --kind fragment -

OPTIONS:
      --help                    Prints this help
  -V, --version                 Prints version

  -k, --kind KIND               Selects the grammar
                                [default: path]
                                [possible values: path, points, transform, length,
                                lengths, angle, clock, aspect-ratio, fragment]
      --tolerant                Reports errors as warnings and continues
      --locale LOCALE           Sets the locale of error messages
                                [default: en]
      --verbose                 Prints skipped input
      --quiet                   Disables warnings

ARGS:
  <value>                       Attribute value
";

#[derive(Clone, Copy, PartialEq, Debug)]
enum Kind {
    Path,
    Points,
    Transform,
    Length,
    LengthList,
    Angle,
    Clock,
    AspectRatio,
    Fragment,
}

impl std::str::FromStr for Kind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "path" => Ok(Kind::Path),
            "points" => Ok(Kind::Points),
            "transform" => Ok(Kind::Transform),
            "length" => Ok(Kind::Length),
            "lengths" => Ok(Kind::LengthList),
            "angle" => Ok(Kind::Angle),
            "clock" => Ok(Kind::Clock),
            "aspect-ratio" => Ok(Kind::AspectRatio),
            "fragment" => Ok(Kind::Fragment),
            _ => Err("invalid grammar"),
        }
    }
}

#[derive(Debug)]
struct Args {
    kind: Kind,
    tolerant: bool,
    locale: Option<String>,
    verbose: bool,
    quiet: bool,
    value: String,
}

fn collect_args() -> Result<Args, pico_args::Error> {
    let mut input = pico_args::Arguments::from_env();

    if input.contains("--help") {
        print!("{}", HELP);
        std::process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    Ok(Args {
        kind:       input.opt_value_from_str(["-k", "--kind"])?.unwrap_or(Kind::Path),
        tolerant:   input.contains("--tolerant"),
        locale:     input.opt_value_from_fn("--locale", parse_locale)?,
        verbose:    input.contains("--verbose"),
        quiet:      input.contains("--quiet"),
        value:      input.free_from_str()?,
    })
}

fn parse_locale(s: &str) -> Result<String, String> {
    let locale = s.trim();
    if locale.is_empty() {
        return Err("locale cannot be empty".to_string());
    }

    Ok(locale.to_string())
}

fn run<'e, P: Parser<'e>>(mut p: P, args: &Args) -> Result<(), String> {
    if args.tolerant {
        p.set_error_handler(LogErrors);
    }

    if let Some(ref locale) = args.locale {
        p.set_locale(locale);
    }

    let res = if args.value == "-" {
        let stdin = io::stdin();
        let handle = stdin.lock();
        p.parse_reader(handle)
    } else {
        p.parse(&args.value)
    };

    res.map_err(|e| e.to_string())
}

/// Prints every event on its own line.
struct EventPrinter;

impl PathHandler for EventPrinter {
    fn start_path(&mut self) {
        println!("start path");
    }

    fn segment(&mut self, segment: PathSegment) {
        println!("{:?}", segment);
    }

    fn end_path(&mut self) {
        println!("end path");
    }
}

impl PointsHandler for EventPrinter {
    fn start_points(&mut self) {
        println!("start points");
    }

    fn point(&mut self, x: f32, y: f32) {
        println!("point {} {}", x, y);
    }

    fn end_points(&mut self) {
        println!("end points");
    }
}

impl TransformListHandler for EventPrinter {
    fn start_transform_list(&mut self) {
        println!("start transform list");
    }

    fn transform(&mut self, token: TransformListToken) {
        println!("{:?}", token);
    }

    fn end_transform_list(&mut self) {
        println!("end transform list");
    }
}

impl LengthHandler for EventPrinter {
    fn start_length(&mut self) {
        println!("start length");
    }

    fn length_value(&mut self, value: f32) {
        println!("value {}", value);
    }

    fn length_unit(&mut self, unit: LengthUnit) {
        println!("unit {:?}", unit);
    }

    fn end_length(&mut self) {
        println!("end length");
    }
}

impl LengthListHandler for EventPrinter {
    fn start_length_list(&mut self) {
        println!("start length list");
    }

    fn end_length_list(&mut self) {
        println!("end length list");
    }
}

impl AngleHandler for EventPrinter {
    fn start_angle(&mut self) {
        println!("start angle");
    }

    fn angle_value(&mut self, value: f32) {
        println!("value {}", value);
    }

    fn angle_unit(&mut self, unit: AngleUnit) {
        println!("unit {:?}", unit);
    }

    fn end_angle(&mut self) {
        println!("end angle");
    }
}

impl ClockHandler for EventPrinter {
    fn start_clock(&mut self) {
        println!("start clock");
    }

    fn int_value(&mut self, value: u32, digits: usize) {
        println!("int {} ({} digits)", value, digits);
    }

    fn colon(&mut self) {
        println!("colon");
    }

    fn dot(&mut self) {
        println!("dot");
    }

    fn clock_unit(&mut self, unit: ClockUnit) {
        println!("unit {:?}", unit);
    }

    fn end_clock(&mut self) {
        println!("end clock");
    }
}

impl PreserveAspectRatioHandler for EventPrinter {
    fn start_preserve_aspect_ratio(&mut self) {
        println!("start preserveAspectRatio");
    }

    fn defer(&mut self) {
        println!("defer");
    }

    fn align(&mut self, align: Align) {
        println!("{:?}", align);
    }

    fn meet_or_slice(&mut self, value: MeetOrSlice) {
        println!("{:?}", value);
    }

    fn end_preserve_aspect_ratio(&mut self) {
        println!("end preserveAspectRatio");
    }
}

impl FragmentIdentifierHandler for EventPrinter {
    fn start_fragment_identifier(&mut self) {
        println!("start fragment identifier");
    }

    fn id_reference(&mut self, id: &str) {
        println!("id {}", id);
    }

    fn view_box(&mut self, x: f32, y: f32, width: f32, height: f32) {
        println!("viewBox {} {} {} {}", x, y, width, height);
    }

    fn start_view_target(&mut self) {
        println!("start viewTarget");
    }

    fn view_target(&mut self, name: &str) {
        println!("viewTarget {}", name);
    }

    fn end_view_target(&mut self) {
        println!("end viewTarget");
    }

    fn zoom_and_pan(&mut self, value: ZoomAndPan) {
        println!("zoomAndPan {:?}", value);
    }

    fn end_fragment_identifier(&mut self) {
        println!("end fragment identifier");
    }
}

static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, record.args()),
                log::Level::Warn  => eprintln!("Warning (in {}:{}): {}", target, line, record.args()),
                log::Level::Info  => eprintln!("Info (in {}:{}): {}", target, line, record.args()),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, record.args()),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, record.args()),
            }
        }
    }

    fn flush(&self) {}
}
