//! Field requirement strategies
//!
//! Decides which optional field groups a transformation form shows and
//! requires. The strategy is picked once per commodity; callers only ever
//! talk to the `FieldRequirementStrategy` trait.

use serde::{Deserialize, Serialize};

use crate::models::{CommodityType, FacilityFlags, TransformationType};

/// Visibility and requirement of one field group.
///
/// A required field is always visible.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldRequirement {
    pub visible: bool,
    pub required: bool,
}

impl FieldRequirement {
    pub const HIDDEN: FieldRequirement = FieldRequirement {
        visible: false,
        required: false,
    };
    pub const OPTIONAL: FieldRequirement = FieldRequirement {
        visible: true,
        required: false,
    };
    pub const REQUIRED: FieldRequirement = FieldRequirement {
        visible: true,
        required: true,
    };

    /// Visible when `visible`, and required as well when `required`
    pub fn when(visible: bool, required: bool) -> Self {
        Self {
            visible: visible || required,
            required,
        }
    }

    pub fn is_disabled(&self) -> bool {
        !self.visible
    }
}

/// Requirement of every optional field group on a transformation form
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldRequirementSet {
    pub price: FieldRequirement,
    pub payment_method: FieldRequirement,
    pub moisture: FieldRequirement,
    pub sensorial_analysis: FieldRequirement,
    pub freezing: FieldRequirement,
    pub classification: FieldRequirement,
    pub lot_number: FieldRequirement,
}

/// Per-commodity rules for field visibility
pub trait FieldRequirementStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn resolve(
        &self,
        flags: &FacilityFlags,
        transformation_type: TransformationType,
    ) -> FieldRequirementSet;
}

/// Commodities paid by weight at delivery (cocoa, coffee)
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceDrivenStrategy;

impl FieldRequirementStrategy for PriceDrivenStrategy {
    fn name(&self) -> &'static str {
        "price_driven"
    }

    fn resolve(
        &self,
        flags: &FacilityFlags,
        transformation_type: TransformationType,
    ) -> FieldRequirementSet {
        let purchase = transformation_type == TransformationType::Purchase;
        let lot_number_required = matches!(
            transformation_type,
            TransformationType::Processing
                | TransformationType::FinalProcessing
                | TransformationType::GenerateQrCode
        );

        FieldRequirementSet {
            price: FieldRequirement::when(purchase, purchase),
            payment_method: FieldRequirement::when(purchase, purchase && flags.is_collection_facility),
            moisture: FieldRequirement::when(purchase, false),
            sensorial_analysis: FieldRequirement::when(flags.is_laboratory, flags.is_laboratory),
            freezing: FieldRequirement::HIDDEN,
            classification: FieldRequirement::HIDDEN,
            lot_number: FieldRequirement::when(true, lot_number_required),
        }
    }
}

/// Commodities tracked by quality rather than price at this stage (shrimp)
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityDrivenStrategy;

impl FieldRequirementStrategy for QualityDrivenStrategy {
    fn name(&self) -> &'static str {
        "quality_driven"
    }

    fn resolve(
        &self,
        flags: &FacilityFlags,
        transformation_type: TransformationType,
    ) -> FieldRequirementSet {
        let purchase = transformation_type == TransformationType::Purchase;
        let inspected = flags.is_laboratory || flags.is_field_inspection;

        FieldRequirementSet {
            price: FieldRequirement::HIDDEN,
            payment_method: FieldRequirement::HIDDEN,
            moisture: FieldRequirement::HIDDEN,
            sensorial_analysis: FieldRequirement::when(purchase || inspected, inspected),
            freezing: FieldRequirement::when(flags.is_freezing_process, flags.is_freezing_process),
            classification: FieldRequirement::when(
                flags.is_classification_process,
                flags.is_classification_process,
            ),
            lot_number: FieldRequirement::REQUIRED,
        }
    }
}

static PRICE_DRIVEN: PriceDrivenStrategy = PriceDrivenStrategy;
static QUALITY_DRIVEN: QualityDrivenStrategy = QualityDrivenStrategy;

/// Pick the strategy for a commodity
pub fn strategy_for(commodity: CommodityType) -> &'static dyn FieldRequirementStrategy {
    match commodity {
        CommodityType::Cocoa | CommodityType::Coffee => &PRICE_DRIVEN,
        CommodityType::Shrimp => &QUALITY_DRIVEN,
    }
}

/// Resolve field requirements for a commodity, facility and transformation
pub fn resolve_field_requirements(
    commodity: CommodityType,
    flags: &FacilityFlags,
    transformation_type: TransformationType,
) -> FieldRequirementSet {
    strategy_for(commodity).resolve(flags, transformation_type)
}

type ChangeCallback = Box<dyn FnMut(&FieldRequirementSet) + Send>;

/// Keeps a resolved requirement set in step with its inputs.
///
/// Every setter recomputes the set; the change callback fires only when
/// the resolved set actually differs from the previous one.
pub struct FieldRequirementTracker {
    strategy: &'static dyn FieldRequirementStrategy,
    flags: FacilityFlags,
    transformation_type: TransformationType,
    current: FieldRequirementSet,
    on_change: Option<ChangeCallback>,
}

impl FieldRequirementTracker {
    pub fn new(
        commodity: CommodityType,
        flags: FacilityFlags,
        transformation_type: TransformationType,
    ) -> Self {
        let strategy = strategy_for(commodity);
        Self {
            strategy,
            flags,
            transformation_type,
            current: strategy.resolve(&flags, transformation_type),
            on_change: None,
        }
    }

    pub fn on_change(mut self, callback: impl FnMut(&FieldRequirementSet) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn current(&self) -> &FieldRequirementSet {
        &self.current
    }

    pub fn set_commodity(&mut self, commodity: CommodityType) {
        self.strategy = strategy_for(commodity);
        self.recompute();
    }

    pub fn set_flags(&mut self, flags: FacilityFlags) {
        self.flags = flags;
        self.recompute();
    }

    pub fn set_transformation_type(&mut self, transformation_type: TransformationType) {
        self.transformation_type = transformation_type;
        self.recompute();
    }

    fn recompute(&mut self) {
        let next = self.strategy.resolve(&self.flags, self.transformation_type);
        if next != self.current {
            self.current = next;
            if let Some(callback) = self.on_change.as_mut() {
                callback(&self.current);
            }
        }
    }
}

impl std::fmt::Debug for FieldRequirementTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRequirementTracker")
            .field("strategy", &self.strategy.name())
            .field("flags", &self.flags)
            .field("transformation_type", &self.transformation_type)
            .field("current", &self.current)
            .finish()
    }
}
