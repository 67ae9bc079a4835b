//! Static configuration of the test packages.
//!
//! Each package lives on `srcdata/<package>/<branch>` branches of the
//! repository and is released with `srcdata/<package>[/<branch>]/release/*`
//! tags.

mod package;

pub use package::{PRIMARY_BRANCH, PackageDescriptor, TEST_PACKAGES};
