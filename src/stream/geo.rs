use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::iter::Iterator;

///
/// Line delimited GeoJSON reader over a file or stdin
///
pub struct GeoStream {
    input: Input
}

pub enum Input {
    File(std::io::Lines<BufReader<File>>),
    StdIn(std::io::Lines<std::io::StdinLock<'static>>),
    Buffer(std::vec::IntoIter<String>)
}

impl GeoStream {
    pub fn new(input: Option<String>) -> Result<Self, String> {
        match input {
            Some(inpath) => match File::open(&inpath) {
                Ok(file) => Ok(GeoStream {
                    input: Input::File(BufReader::new(file).lines())
                }),
                Err(err) => Err(format!("Unable to open input file {}: {}", inpath, err))
            },
            None => Ok(GeoStream {
                input: Input::StdIn(io::stdin().lock().lines())
            })
        }
    }

    ///
    /// Stream over in-memory lines
    ///
    pub fn from_lines(lines: Vec<String>) -> Self {
        GeoStream {
            input: Input::Buffer(lines.into_iter())
        }
    }

    fn line(input: &mut Input) -> Option<Result<String, String>> {
        match input {
            Input::File(ref mut file) => file.next().map(|line| line.map_err(|err| err.to_string())),
            Input::StdIn(ref mut stdin) => stdin.next().map(|line| line.map_err(|err| err.to_string())),
            Input::Buffer(ref mut buffer) => buffer.next().map(Ok)
        }
    }
}

impl Iterator for GeoStream {
    type Item = Result<geojson::GeoJson, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::from("");

        while line.trim().is_empty() {
            line = match GeoStream::line(&mut self.input)? {
                Ok(line) => line,
                Err(err) => { return Some(Err(format!("Failed to read line: {}", err))); }
            };
        }

        //Remove Ascii Record Separators at beginning or end of line
        if line.ends_with('\u{001E}') {
            line.pop();
        } else if line.starts_with('\u{001E}') {
            line.replace_range(0..1, "");
        }

        match line.parse::<geojson::GeoJson>() {
            Ok(geojson) => Some(Ok(geojson)),
            Err(err) => Some(Err(format!("Invalid GeoJSON ({:?}): {}", err, line)))
        }
    }
}
