use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;

use crate::{auth::Claims, errors::AppError};

// Failures surface as AppError so rejected requests get the same JSON
// error body as the rest of the API.
fn unauthorized(message: &str) -> Error {
    AppError::Unauthorized(message.to_string()).into()
}

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            // Extract JWT service from app data
            let jwt_service = req
                .app_data::<actix_web::web::Data<crate::auth::JwtService>>()
                .ok_or_else(|| unauthorized("JWT service not configured"))?;

            // Extract token from Authorization header
            let auth_header = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| unauthorized("Missing authorization header"))?;

            let token = auth_header
                .strip_prefix("Bearer ")
                .ok_or_else(|| unauthorized("Invalid authorization header format"))?;

            // Validate token and extract claims
            let claims = jwt_service
                .validate_token(token)
                .map_err(|_| unauthorized("Invalid or expired token"))?;

            // Insert claims into request extensions
            req.extensions_mut().insert(claims);

            // Call the next service
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

// Extractor for authenticated user in handlers
pub struct AuthenticatedUser(pub Claims);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let claims = req
            .extensions()
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()));

        ready(claims.map(AuthenticatedUser))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    use super::*;
    use crate::{auth::JwtService, config::Config, models::domain::User};

    async fn whoami(auth: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(auth.0.username)
    }

    fn jwt_service() -> JwtService {
        let config = Config::test_config();
        JwtService::new(&config.jwt_secret, 1, 168)
    }

    #[actix_rt::test]
    async fn test_missing_header_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(jwt_service()))
                .wrap(AuthMiddleware)
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_non_bearer_header_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(jwt_service()))
                .wrap(AuthMiddleware)
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_valid_token_reaches_handler_with_claims() {
        let jwt = jwt_service();
        let user = User::new("johndoe", "John", "Doe", "$argon2id$stub");
        let token = jwt.create_token(&user).unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(jwt))
                .wrap(AuthMiddleware)
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, "johndoe");
    }
}
