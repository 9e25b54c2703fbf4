use std::fs::File;
use std::io::{self, BufWriter, Write};
use indicatif::ProgressBar;
use crate::{proj, resolve};
use crate::stream::{GeoStream, StreetStream};
use crate::types::{AsFeat, Context, Keys, Street};

pub fn main(args: &clap_v3::ArgMatches) -> Result<(), String> {
    let tolerance: f64 = crate::arg(args, "buffer")?.unwrap_or(5.0);
    let threads = crate::threads(args)?;

    let mut context = Context::new(tolerance, 90, threads)?;
    context.scope = args.value_of("scope").unwrap_or("name").parse()?;
    context.merge = args.value_of("merge").unwrap_or("first").parse()?;
    context.iterate = args.is_present("iterate");
    context.keys = Keys {
        id: args.value_of("id").unwrap_or("id").to_string(),
        name: args.value_of("name").unwrap_or("name").to_string(),
        year: args.value_of("year").unwrap_or("year").to_string()
    };

    let wgs84 = args.is_present("wgs84");

    let mut stream = StreetStream::new(
        GeoStream::new(args.value_of("INPUT").map(String::from))?,
        context.keys.clone(),
        args.value_of("error").map(String::from)
    )?;

    let mut streets: Vec<Street> = stream.by_ref().collect();
    eprintln!("ok - imported {} street segments ({} skipped)", streets.len(), stream.skipped);

    if wgs84 {
        for street in streets.iter_mut() {
            proj::project(&mut street.geom);
        }
    }

    let imported = streets.len();

    let pb = ProgressBar::new(resolve::group_count(&streets, context.scope) as u64);
    let mut resolved = resolve::resolve_all_with(streets, &context, || {
        pb.inc(1);
    })?;
    pb.finish();

    eprintln!("ok - resolved {} segments into {} streets", imported, resolved.len());

    if wgs84 {
        for street in resolved.iter_mut() {
            proj::unproject(&mut street.geom);
        }
    }

    match args.value_of("output") {
        Some(path) => match File::create(path) {
            Ok(file) => write(BufWriter::new(file), resolved, &context.keys)?,
            Err(err) => { return Err(format!("Unable to create output {}: {}", path, err)); }
        },
        None => write(BufWriter::new(io::stdout().lock()), resolved, &context.keys)?
    };

    Ok(())
}

///
/// Write streets as line delimited GeoJSON features
///
pub fn write(mut output: impl Write, streets: Vec<Street>, keys: &Keys) -> Result<(), String> {
    for street in streets {
        let feat = geojson::GeoJson::Feature(street.as_feat(keys));

        if let Err(err) = writeln!(output, "{}", feat.to_string()) {
            return Err(format!("Failed to write feature: {}", err));
        }
    }

    output.flush().map_err(|err| format!("Failed to flush output: {}", err))
}
