//! Typed snapshots of OData metadata, UI annotations and manifest settings,
//! plus the table descriptor produced from them.
//!
//! - **metadata**: entity sets, entity types, properties, actions and the
//!   [`MetadataAccessor`] trait used by the compiler
//! - **annotation** / **data_field**: annotation paths and the closed set of
//!   UI data field records
//! - **capabilities**: the [`CapabilityResolver`] trait
//! - **manifest**: per-visualization overrides and navigation settings
//! - **table**: the compiled [`TableVisualization`]
//! - **diagnostics**: issue types and the [`DiagnosticsSink`] trait

pub mod annotation;
pub mod capabilities;
pub mod data_field;
pub mod diagnostics;
pub mod enums;
pub mod error;
pub mod manifest;
pub mod metadata;
pub mod table;

pub use annotation::{
    AnnotationPath, AnnotationPathExpression, Dynamic, DynamicBool, PathExpression, Term,
};
pub use capabilities::{Capability, CapabilityResolver};
pub use data_field::{
    DataField, DataFieldAbstract, DataFieldForAction, DataFieldForAnnotation,
    DataFieldForIntentBasedNavigation, DataFieldWithAction, DataFieldWithIntentBasedNavigation,
    DataFieldWithNavigationPath, DataFieldWithUrl, DataPoint, FieldAnnotations, FieldGroup,
    PresentationVariant, SortOrder,
};
pub use diagnostics::{DiagnosticsCollector, DiagnosticsSink, Issue, IssueCategory, IssueSeverity};
pub use enums::{
    CreationMode, EnableOnSelect, HorizontalAlign, Importance, Placement, RowCountMode,
    SelectionModeSetting, TableType, TemplateType, TextArrangement, VariantManagementType,
};
pub use error::{ModelError, Result};
pub use manifest::{
    BindingValue, ControlConfiguration, CreationModeSettings, ManifestAction,
    ManifestColumn, ManifestSettings, NavigationSettings, NavigationTarget, OutboundDetail,
    PersonalizationOptions, PersonalizationSetting, Position, TableSettings,
};
pub use metadata::{
    ActionAnnotations, ActionDefinition, AnnotationTarget, ApplySupported, ComplexType,
    CustomAggregate, DeleteRestrictions, DraftRoot, EntitySet, EntitySetAnnotations, EntityType,
    EntityTypeAnnotations, HeaderInfo, InsertRestrictions, MetadataAccessor, NavigationProperty,
    NavigationRestrictions, Property, PropertyAnnotations, PropertyTarget, Qualified,
    RecursiveHierarchy, ResolvedAnnotation, RestrictedNavigation, SearchRestrictions,
    ServiceMetadata, SortRestrictions, StickySessionSupported, UpdateRestrictions,
};
pub use table::{
    Action, ActionKind, AggregateCondition, AggregateConditions, AggregateDefinition,
    Availability, Column, ColumnExtension, ColumnKind, CreateBehavior, CustomAggregateDefinition,
    ExportSettings, ExportType, ExternalCreate, FormatOptions, GroupConditions, GroupLevel,
    InAppCreate, RowAction, RowConfiguration, SelectionMode, SelectionModeValue,
    ShowConfiguration, SortConditions, Sorter, TableAnnotationConfiguration,
    TableControlConfiguration, TableVisualization, TypeConfig, TypeConstraints,
};
