fn main() -> std::io::Result<()> {
    chartdir_lib::run()
}
