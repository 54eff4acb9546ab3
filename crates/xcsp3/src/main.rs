//! XCSP3 parser CLI.

use xcsp3::demos::{PrintBank, SummaryBank};
use xcsp3_parse::{CallbackBank, ParserConfig};

fn main() {
    xcsp3::tracing_setup::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "parse" => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: xcsp3 parse <file.xml>");
                std::process::exit(1);
            };
            parse_quiet(path);
        }
        "summary" => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: xcsp3 summary <file.xml>");
                std::process::exit(1);
            };
            summarize(path);
        }
        "print" => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: xcsp3 print <file.xml>");
                std::process::exit(1);
            };
            print_trace(path);
        }
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-v" => println!("xcsp3 {}", env!("CARGO_PKG_VERSION")),
        other => {
            if other.ends_with(".xml") {
                summarize(other);
            } else {
                eprintln!("Unknown command: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("XCSP3 streaming parser");
    println!();
    println!("Usage: xcsp3 <command> <file.xml>");
    println!();
    println!("Commands:");
    println!("  parse <file.xml>    Parse and report variable/constraint counts");
    println!("  summary <file.xml>  Parse and print a one-line nbv,nbc,minmax,objective summary");
    println!("  print <file.xml>    Parse and print an indented trace of every event");
    println!("  help                Show this help message");
    println!("  version             Show version information");
    println!();
    println!("Examples:");
    println!("  xcsp3 summary instance.xml");
    println!("  xcsp3 print instance.xml");
    println!("  xcsp3 instance.xml          (shorthand for 'summary')");
}

fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading '{path}': {e}");
            std::process::exit(1);
        }
    }
}

struct CountingBank {
    variables: usize,
    constraints: usize,
}

impl CallbackBank for CountingBank {
    fn build_variable_integer_range(&mut self, _id: &str, _min: i64, _max: i64) {
        self.variables += 1;
    }
    fn build_variable_integer_enum(&mut self, _id: &str, _values: &[i64]) {
        self.variables += 1;
    }
}

fn parse_quiet(path: &str) {
    let xml = read_file(path);
    let mut bank = CountingBank { variables: 0, constraints: 0 };
    match xcsp3::parse_document(&xml, ParserConfig::default(), &mut bank) {
        Ok(instance) => {
            bank.constraints = instance.constraints.len();
            println!(
                "{}: {} variables, {} arrays, {} constraints, {} objectives",
                path,
                bank.variables,
                instance.arrays.len(),
                bank.constraints,
                instance.objectives.len()
            );
        }
        Err(e) => {
            eprintln!("Error parsing '{path}': {e}");
            std::process::exit(1);
        }
    }
}

fn summarize(path: &str) {
    let xml = read_file(path);
    let mut bank = SummaryBank::new();
    match xcsp3::parse_document(&xml, ParserConfig::default(), &mut bank) {
        Ok(_) => println!("{}", bank.report()),
        Err(e) => {
            eprintln!("Error parsing '{path}': {e}");
            std::process::exit(1);
        }
    }
}

fn print_trace(path: &str) {
    let xml = read_file(path);
    let mut bank = PrintBank::new();
    if let Err(e) = xcsp3::parse_document(&xml, ParserConfig::default(), &mut bank) {
        eprintln!("Error parsing '{path}': {e}");
        std::process::exit(1);
    }
}
