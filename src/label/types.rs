use serde::{Deserialize, Serialize};

use crate::constants::FIELD_COUNT;

/// A single transcribed value from a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelField {
    pub text: String,
}

impl LabelField {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// The government warning, with the typography flags only this field carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningField {
    pub text: String,
    #[serde(default)]
    pub is_bold: bool,
    #[serde(default)]
    pub is_all_caps: bool,
}

impl WarningField {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let is_all_caps = is_upper_heading(&text);
        Self {
            text,
            is_bold: false,
            is_all_caps,
        }
    }

    pub fn bold(mut self, is_bold: bool) -> Self {
        self.is_bold = is_bold;
        self
    }
}

fn is_upper_heading(text: &str) -> bool {
    text.trim_start().starts_with("GOVERNMENT WARNING")
}

/// Product category supplied with the reference record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    Beer,
    Wine,
    Whiskey,
    Rum,
    OtherSpirits,
}

/// One of the additive disclosures TTB requires when the ingredient is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdditiveKind {
    FdcYellow5,
    CochinealCarmine,
    Sulfites,
    Aspartame,
    Saccharin,
}

impl AdditiveKind {
    pub const ALL: [AdditiveKind; 5] = [
        AdditiveKind::FdcYellow5,
        AdditiveKind::CochinealCarmine,
        AdditiveKind::Sulfites,
        AdditiveKind::Aspartame,
        AdditiveKind::Saccharin,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            AdditiveKind::FdcYellow5 => "FD&C Yellow No. 5",
            AdditiveKind::CochinealCarmine => "Cochineal Extract / Carmine",
            AdditiveKind::Sulfites => "Sulfites",
            AdditiveKind::Aspartame => "Aspartame",
            AdditiveKind::Saccharin => "Saccharin",
        }
    }
}

/// Five independent additive booleans, used both for detected ingredients and for
/// disclosures found on the label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditiveFlags {
    pub fdc_yellow_5: bool,
    pub cochineal_carmine: bool,
    pub sulfites: bool,
    pub aspartame: bool,
    pub saccharin: bool,
}

impl AdditiveFlags {
    pub fn get(&self, kind: AdditiveKind) -> bool {
        match kind {
            AdditiveKind::FdcYellow5 => self.fdc_yellow_5,
            AdditiveKind::CochinealCarmine => self.cochineal_carmine,
            AdditiveKind::Sulfites => self.sulfites,
            AdditiveKind::Aspartame => self.aspartame,
            AdditiveKind::Saccharin => self.saccharin,
        }
    }

    pub fn set(&mut self, kind: AdditiveKind, value: bool) {
        match kind {
            AdditiveKind::FdcYellow5 => self.fdc_yellow_5 = value,
            AdditiveKind::CochinealCarmine => self.cochineal_carmine = value,
            AdditiveKind::Sulfites => self.sulfites = value,
            AdditiveKind::Aspartame => self.aspartame = value,
            AdditiveKind::Saccharin => self.saccharin = value,
        }
    }

    pub fn any(&self) -> bool {
        AdditiveKind::ALL.iter().any(|k| self.get(*k))
    }

    /// Kinds whose flag is set.
    pub fn present(&self) -> impl Iterator<Item = AdditiveKind> + '_ {
        AdditiveKind::ALL.into_iter().filter(|k| self.get(*k))
    }

    /// Number of flags on which `self` and `other` agree.
    pub fn agreements(&self, other: &AdditiveFlags) -> usize {
        AdditiveKind::ALL
            .iter()
            .filter(|k| self.get(**k) == other.get(**k))
            .count()
    }
}

/// The eight comparable field keys, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    BrandName,
    ClassType,
    AlcoholContent,
    NetContents,
    BottlerProducer,
    CountryOfOrigin,
    GovernmentWarning,
    AdditivesDisclosed,
}

impl FieldKey {
    pub const ALL: [FieldKey; FIELD_COUNT] = [
        FieldKey::BrandName,
        FieldKey::ClassType,
        FieldKey::AlcoholContent,
        FieldKey::NetContents,
        FieldKey::BottlerProducer,
        FieldKey::CountryOfOrigin,
        FieldKey::GovernmentWarning,
        FieldKey::AdditivesDisclosed,
    ];

    /// Wire key, as used in JSON payloads and the scoring schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::BrandName => "brandName",
            FieldKey::ClassType => "classType",
            FieldKey::AlcoholContent => "alcoholContent",
            FieldKey::NetContents => "netContents",
            FieldKey::BottlerProducer => "bottlerProducer",
            FieldKey::CountryOfOrigin => "countryOfOrigin",
            FieldKey::GovernmentWarning => "governmentWarning",
            FieldKey::AdditivesDisclosed => "additivesDisclosed",
        }
    }

    /// Human-readable name used in verification results.
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldKey::BrandName => "Brand Name",
            FieldKey::ClassType => "Class/Type",
            FieldKey::AlcoholContent => "Alcohol Content",
            FieldKey::NetContents => "Net Contents",
            FieldKey::BottlerProducer => "Bottler/Producer",
            FieldKey::CountryOfOrigin => "Country of Origin",
            FieldKey::GovernmentWarning => "Government Warning",
            FieldKey::AdditivesDisclosed => "Additive Disclosures",
        }
    }

    /// Fields that are compared on every label.
    pub fn is_always_required(&self) -> bool {
        !matches!(
            self,
            FieldKey::AlcoholContent | FieldKey::CountryOfOrigin | FieldKey::AdditivesDisclosed
        )
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FieldKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown field key: {}", s))
    }
}

/// One extraction attempt's transcription of a label.
///
/// `None` means the value was not visibly present or could not be read with confidence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedLabel {
    pub brand_name: Option<LabelField>,
    pub class_type: Option<LabelField>,
    pub alcohol_content: Option<LabelField>,
    pub net_contents: Option<LabelField>,
    pub bottler_producer: Option<LabelField>,
    pub country_of_origin: Option<LabelField>,
    pub government_warning: Option<WarningField>,
    pub additives_disclosed: Option<AdditiveFlags>,
}

impl ExtractedLabel {
    /// Transcribed text for `key`; always `None` for the additive disclosures.
    pub fn text(&self, key: FieldKey) -> Option<&str> {
        let field = match key {
            FieldKey::BrandName => self.brand_name.as_ref(),
            FieldKey::ClassType => self.class_type.as_ref(),
            FieldKey::AlcoholContent => self.alcohol_content.as_ref(),
            FieldKey::NetContents => self.net_contents.as_ref(),
            FieldKey::BottlerProducer => self.bottler_producer.as_ref(),
            FieldKey::CountryOfOrigin => self.country_of_origin.as_ref(),
            FieldKey::GovernmentWarning => {
                return self.government_warning.as_ref().map(|w| w.text.as_str());
            }
            FieldKey::AdditivesDisclosed => None,
        };
        field.map(|f| f.text.as_str())
    }

    pub fn is_present(&self, key: FieldKey) -> bool {
        match key {
            FieldKey::AdditivesDisclosed => self.additives_disclosed.is_some(),
            _ => self.text(key).is_some(),
        }
    }

    pub fn null_count(&self) -> usize {
        FieldKey::ALL
            .iter()
            .filter(|k| !self.is_present(**k))
            .count()
    }

    /// Copies one field's raw value from `source` into `self`.
    pub fn copy_field(&mut self, key: FieldKey, source: &ExtractedLabel) {
        match key {
            FieldKey::BrandName => self.brand_name = source.brand_name.clone(),
            FieldKey::ClassType => self.class_type = source.class_type.clone(),
            FieldKey::AlcoholContent => self.alcohol_content = source.alcohol_content.clone(),
            FieldKey::NetContents => self.net_contents = source.net_contents.clone(),
            FieldKey::BottlerProducer => self.bottler_producer = source.bottler_producer.clone(),
            FieldKey::CountryOfOrigin => self.country_of_origin = source.country_of_origin.clone(),
            FieldKey::GovernmentWarning => {
                self.government_warning = source.government_warning.clone()
            }
            FieldKey::AdditivesDisclosed => self.additives_disclosed = source.additives_disclosed,
        }
    }

    /// Replaces blank transcriptions with `None`, since a present field is never empty.
    pub fn normalized(mut self) -> Self {
        fn blank(f: &Option<LabelField>) -> bool {
            f.as_ref().is_some_and(|f| f.text.trim().is_empty())
        }
        for slot in [
            &mut self.brand_name,
            &mut self.class_type,
            &mut self.alcohol_content,
            &mut self.net_contents,
            &mut self.bottler_producer,
            &mut self.country_of_origin,
        ] {
            if blank(slot) {
                *slot = None;
            }
        }
        if self
            .government_warning
            .as_ref()
            .is_some_and(|w| w.text.trim().is_empty())
        {
            self.government_warning = None;
        }
        self
    }
}

/// Reference record supplied by the caller (e.g. from the COLA application).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedLabel {
    pub brand_name: String,
    pub class_type: String,
    #[serde(default)]
    pub alcohol_content: Option<String>,
    pub net_contents: String,
    pub bottler_producer: String,
    #[serde(default)]
    pub country_of_origin: Option<String>,
    pub government_warning: String,
    #[serde(default)]
    pub product_type: Option<ProductType>,
    #[serde(default)]
    pub is_imported: bool,
    #[serde(default)]
    pub age_years: Option<f64>,
    #[serde(default)]
    pub additives_detected: AdditiveFlags,
}

impl ExpectedLabel {
    /// Expected text for `key`; blank optional values read as `None`.
    pub fn text(&self, key: FieldKey) -> Option<&str> {
        let value = match key {
            FieldKey::BrandName => Some(self.brand_name.as_str()),
            FieldKey::ClassType => Some(self.class_type.as_str()),
            FieldKey::AlcoholContent => self.alcohol_content.as_deref(),
            FieldKey::NetContents => Some(self.net_contents.as_str()),
            FieldKey::BottlerProducer => Some(self.bottler_producer.as_str()),
            FieldKey::CountryOfOrigin => self.country_of_origin.as_deref(),
            FieldKey::GovernmentWarning => Some(self.government_warning.as_str()),
            FieldKey::AdditivesDisclosed => None,
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Returns the first required field that is blank, if any.
    pub fn missing_required(&self) -> Option<FieldKey> {
        FieldKey::ALL
            .into_iter()
            .filter(FieldKey::is_always_required)
            .find(|k| self.text(*k).is_none())
    }

    pub fn is_well_formed(&self) -> bool {
        self.missing_required().is_none()
    }
}
