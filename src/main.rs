#[tokio::main]
async fn main() {
    let code = recordsheet_lib::run().await;
    std::process::exit(code);
}
