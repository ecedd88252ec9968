use axum::{
    routing::post,
    Router,
};
use lambda_http::{run, Error};
use renewal_eligibility::core::controller::AppState;
use renewal_eligibility::core::repository::RepositoryStore;
use renewal_eligibility::renewal::controller::evaluate_renewals;
use renewal_eligibility::utils::ddb::setup_tracing;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let store = RepositoryStore::from(std::env::var("RENEWAL_STORE").unwrap_or_else(|_| "aws".to_string()));
    if store == RepositoryStore::LocalDynamoDB {
        std::env::set_var("AWS_LAMBDA_FUNCTION_NAME", "_");
        std::env::set_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "4096");
        std::env::set_var("AWS_LAMBDA_FUNCTION_VERSION", "1");
        std::env::set_var("AWS_LAMBDA_RUNTIME_API", "http://[::]:9000/.rt");
    }

    let app = Router::new()
        .route("/renewals/evaluate", post(evaluate_renewals))
        .with_state(AppState::new(store));

    run(app).await
}
