//! Domain models for the marketplace admin backend.

pub mod commerce;
pub mod geography;
pub mod legal_representative;
pub mod payout_method;
pub mod permission;
pub mod permission_tree;
pub mod priority_type;
pub mod resource;
pub mod role;
pub mod user;

pub use commerce::{
    Commerce, CommerceStatus, CreateCommerceRequest, ReviewCommerceRequest, ReviewDecision,
    UpdateCommerceRequest,
};
pub use geography::{
    City, Country, CreateCityRequest, CreateCountryRequest, CreateDepartmentRequest,
    CreateNeighborhoodRequest, Department, Neighborhood, UpdateCityRequest, UpdateCountryRequest,
    UpdateDepartmentRequest, UpdateNeighborhoodRequest,
};
pub use legal_representative::{
    CreateLegalRepresentativeRequest, DocumentType, LegalRepresentative,
    UpdateLegalRepresentativeRequest,
};
pub use payout_method::{
    AccountType, CreatePayoutMethodRequest, PayoutMethod, PayoutMethodType,
    UpdatePayoutMethodRequest,
};
pub use permission::{
    AdaptedPermission, CreatePermissionRequest, RawPermission, ReversePermissionsRequest,
    ReversePermissionsResponse,
};
pub use permission_tree::{EntityNode, ModuleNode, NodeLevel, PermissionTree, SidebarNode, TreeNode};
pub use priority_type::{CreatePriorityTypeRequest, PriorityType, UpdatePriorityTypeRequest};
pub use resource::{
    DeletionPolicy, FilterCondition, FilterField, MatchMode, Record, Resource, ResourceFilter,
};
pub use role::{
    AssignRolePermissionsRequest, AssignUserAccessRequest, CreateRoleRequest, Role, RoleFilter,
    RoleStatus, RoleSummary, SetRoleStatusRequest, UpdateRoleRequest, UserAccess,
};
pub use user::{CreateUserRequest, UpdateUserRequest, User, UserSegment};
