use crate::api::leave_request::{CreateLeave, LeaveFilter, LeaveListResponse, LeaveResponse};
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::manager::Manager;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Management API",
        version = "1.0.0",
        description = r#"
## Leave-Request Management Service

Employees submit leave requests; their manager approves or rejects them.

### 🔹 Key Features
- **Accounts**
  - Register as a manager, or as an employee reporting to one
- **Leave Requests**
  - Apply for leave with date range, type and comment
  - Managers review a pending queue and decide inline
  - Filterable history per manager, per-employee view for staff

### 🔐 Security
Endpoints under `/api/v1` are protected with **JWT Bearer authentication**.
Managers and employees see only their own side of the workflow.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for the manager's full listing

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::create_leave,
        crate::api::leave_request::pending_leaves,
        crate::api::leave_request::my_leaves,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::employee::list_employees,
    ),
    components(
        schemas(
            CreateLeave,
            LeaveFilter,
            LeaveResponse,
            LeaveListResponse,
            LeaveRequest,
            LeaveType,
            LeaveStatus,
            Employee,
            Manager
        )
    ),
    tags(
        (name = "Leave", description = "Leave request APIs"),
        (name = "Employee", description = "Roster lookup APIs"),
    )
)]
pub struct ApiDoc;
