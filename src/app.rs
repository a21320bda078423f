use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, Error,
};

use crate::error::AppError;
use crate::routes;
use crate::state::AppState;

/// Builds the application: CORS, request logging, extractor error handlers and routes.
///
/// Shared by `main` and the integration tests so both exercise the same wiring.
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = Error,
    >,
> {
    App::new()
        .app_data(state)
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
        }))
        .app_data(
            web::PathConfig::default()
                .error_handler(|_err, _req| AppError::NotFound("Todo not found".into()).into()),
        )
        .wrap(
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600),
        )
        .wrap(Logger::default())
        .configure(routes::config)
}
