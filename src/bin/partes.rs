fn main() {
    env_logger::init();
    if let Err(err) = partes::app::run() {
        eprintln!("Error al registrar horas extraordinarias: {err:#}");
        std::process::exit(1);
    }
}
