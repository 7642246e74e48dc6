pub mod error;
pub mod geometry;
pub mod horizontal;
pub mod rules;
pub mod runway;
pub mod surfaces;
pub mod zone;

pub use error::SurfaceError;
pub use geometry::{Plane, Point2, Point3, Winding};
pub use horizontal::{Circle, Edge, HorizontalSurface};
pub use rules::SurfaceRules;
pub use runway::{
    ApproachCategory, ApproachDimensions, ApproachProfile, EndPair, EndSelector, Runway,
    RunwayCategory, RunwayEnd,
};
pub use surfaces::{ApproachSurface, PrimarySurface, RunwaySurfaces, Side, TransitionalSurface};
pub use zone::{classify, SurfaceSet, Zone, ZoneResult};
