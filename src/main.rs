use clap_v3::{App, load_yaml};

fn main() {
    let cli_cnf = load_yaml!("cli.yml");
    let args = App::from(cli_cnf).get_matches();

    let result = match args.subcommand() {
        ("align", Some(sub_args)) => street_dedupe::align::main(sub_args),
        ("dedupe", Some(sub_args)) => street_dedupe::dedupe::main(sub_args),
        _ => Err(String::from("Invalid Subcommand: ./street-dedupe --help for valid options"))
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("not ok - {}", err);
        eprintln!();
        std::process::exit(1);
    }
}
