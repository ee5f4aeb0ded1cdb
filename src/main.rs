use mazer::app::App;

fn main() -> std::io::Result<()> {
    // Log to a file: stdout belongs to the renderer while in raw mode
    let file_appender = tracing_appender::rolling::never(".", "mazer.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let app = App::default();
    let mut stdout = std::io::stdout();

    App::setup_terminal(&mut stdout)?;
    let result = app.run(&mut stdout);
    App::restore_terminal(&mut stdout)?;

    result
}
