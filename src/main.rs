use rwrk::error::AppResult;

fn main() -> AppResult<()> {
    rwrk::run()
}
