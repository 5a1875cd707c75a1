use crate::api::location::LocationReport;
use crate::api::punch::{PunchResponse, PunchScreen};
use crate::api::report::{PunchReport, SessionQuery, SessionReport};
use crate::attendance::clock::ClockStatus;
use crate::attendance::state_machine::{PunchButtons, PunchState};
use crate::auth::handlers::LoginResponse;
use crate::model::location::{GeoPoint, LocationStatus};
use crate::model::punch::{PunchRecord, PunchReportRow, PunchType};
use crate::model::role::{EmploymentType, Role};
use crate::model::session::Session;
use crate::model::user::{LoginReq, RegisterReq};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Punch Clock API",
        version = "0.1.0",
        description = r#"
## Employee Punch Clock

Employees register, log in, and record **Punch In** / **Punch Out** events
tagged with the device's geolocation.

### 🔹 Key Features
- **Registration** with role and employment type
- **Punch In / Punch Out**
  - Only the action that follows the last punch is enabled
  - A captured location is required for every punch
- **Reporting**
  - All punches joined with name, role and employment type
  - Worked sessions reconstructed from IN/OUT pairs

### 🔐 Security
Endpoints under `/api` need a **JWT Bearer** token from `/auth/login`.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::logout,

        crate::api::reference::list_roles,
        crate::api::reference::list_employment_types,

        crate::api::location::report_location,
        crate::api::location::location_status,

        crate::api::punch::punch_status,
        crate::api::punch::punch_in,
        crate::api::punch::punch_out,

        crate::api::report::list_punches,
        crate::api::report::list_sessions
    ),
    components(
        schemas(
            RegisterReq,
            LoginReq,
            LoginResponse,
            Role,
            EmploymentType,
            GeoPoint,
            LocationReport,
            LocationStatus,
            PunchType,
            PunchState,
            PunchButtons,
            PunchRecord,
            ClockStatus,
            PunchScreen,
            PunchResponse,
            PunchReportRow,
            PunchReport,
            Session,
            SessionQuery,
            SessionReport
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Auth", description = "Registration, login and logout"),
        (name = "Reference", description = "Roles and employment types"),
        (name = "Location", description = "Geolocation capture"),
        (name = "Punch", description = "Punch in / punch out"),
        (name = "Report", description = "Punch and session reporting"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
