use clusterconf::file::ConfigFile;
use clusterconf::syntax::Syntax;

fn syntax_of(file_name: &str) -> Syntax {
    if file_name.ends_with(".yaml") || file_name.ends_with(".yml") {
        Syntax::Yaml
    } else if file_name.contains("haproxy") {
        Syntax::HaProxy
    } else {
        Syntax::MySql
    }
}

fn main() {
    env_logger::init();

    let Some(file_name) = std::env::args().nth(1) else {
        eprintln!("usage: parse <config file>");
        std::process::exit(1);
    };

    let file = ConfigFile::new(syntax_of(&file_name));
    file.set_file_name(&file_name);
    file.set_path(&file_name);

    match file.parse_source_file() {
        Ok(()) => {
            print!("{}", file.dump());

            for variable in file.collect_variables("") {
                println!(
                    "[{}] {} = {} (line {})",
                    variable.section, variable.variable_name, variable.value, variable.line_number
                );
            }
        }
        Err(e) => {
            println!("error: {}", e);
        }
    }
}
