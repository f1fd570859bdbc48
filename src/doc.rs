use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::{dto::login_dto::LoginDto, dto::register_dto::RegisterDto};
use crate::auth::rto::session_rto::SessionRto;
use crate::linkedin::ConnectRto;
use crate::opinions::{dto::create_opinion_dto::CreateOpinionDto, rto::opinion_rto::OpinionRto};
use crate::servicios::dto::{
  create_servicio_dto::CreateServicioDto,
  create_tipo_servicio_dto::CreateTipoServicioDto,
};
use crate::servicios::rto::tipo_servicio_rto::TipoServicioRto;
use crate::shared::health_check::HealthCheckStats;
use crate::shared::http_error::HttpError;
use crate::technologies::{
  dto::create_technology_dto::CreateTechnologyDto,
  rto::technology_rto::TechnologyRto,
};
use crate::users::dto::{links_dto::LinksDto, update_user_dto::UpdateUserDto};
use crate::users::model::user::{LinkedInProfile, Servicio, UserLinks};
use crate::users::rto::user_rto::UserRto;

/// Registers the session token scheme referenced by protected routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
  fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
    let components = openapi
      .components
      .get_or_insert_with(utoipa::openapi::Components::default);

    components.add_security_scheme(
      "bearer_auth",
      SecurityScheme::Http(
        Http::builder()
          .scheme(HttpAuthScheme::Bearer)
          .bearer_format("JWT")
          .description(Some(
            "Session token returned by /api/users/register and /api/users/login.",
          ))
          .build(),
      ),
    );
  }
}

#[derive(OpenApi)]
#[openapi(
  modifiers(&SecurityAddon),
  info(
    title = "ConectAR-Dev API",
    description = "Marketplace connecting clients with freelance developers."
  ),
  paths(
    crate::auth::register,
    crate::auth::login,
    crate::users::list_users,
    crate::users::list_freelancers,
    crate::users::me,
    crate::users::get_user,
    crate::users::update_user,
    crate::servicios::add_servicio,
    crate::servicios::remove_servicio,
    crate::servicios::list_tipos_servicio,
    crate::servicios::create_tipo_servicio,
    crate::opinions::create_opinion,
    crate::opinions::list_user_opinions,
    crate::technologies::list_technologies,
    crate::technologies::create_technology,
    crate::linkedin::connect,
    crate::linkedin::callback,
    crate::shared::health_check::check_health,
  ),
  components(schemas(
    HttpError,
    RegisterDto,
    LoginDto,
    SessionRto,
    UserRto,
    UpdateUserDto,
    LinksDto,
    UserLinks,
    Servicio,
    LinkedInProfile,
    CreateServicioDto,
    CreateTipoServicioDto,
    TipoServicioRto,
    CreateOpinionDto,
    OpinionRto,
    CreateTechnologyDto,
    TechnologyRto,
    ConnectRto,
    HealthCheckStats,
  )),
  tags(
    (name = "auth", description = "Registration and login"),
    (name = "users", description = "Public profiles and profile editing"),
    (name = "servicios", description = "Service type catalog and freelancer offerings"),
    (name = "opinions", description = "Ratings left between users"),
    (name = "technologies", description = "Technology tags"),
    (name = "linkedin", description = "LinkedIn account linking"),
    (name = "health", description = "Service health")
  )
)]
pub struct ApiDoc;
