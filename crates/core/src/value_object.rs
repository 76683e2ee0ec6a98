//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. In this
/// workspace they are the parsed, validated forms of wire strings (network ranges,
/// remote host addresses) that flow through a single decision and are then dropped.
///
/// The trait requires:
/// - **Clone**: values are cheap to copy
/// - **PartialEq**: compared by value
/// - **Debug**: show up in logs and test failures
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
