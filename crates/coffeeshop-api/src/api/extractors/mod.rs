//! Request extractors

mod permission;

pub use permission::{
    Authorized, CanDeleteDrinks, CanGetDrinksDetail, CanPatchDrinks, CanPostDrinks,
    RequiredPermission,
};
