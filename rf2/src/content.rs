//! RF2 content types, their specification headers and row filters.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Rf2Error;
use crate::release::ReleaseType;

/// Characteristic type of stated relationships.
pub const STATED_RELATIONSHIP: &str = "900000000000010007";

/// Position of `characteristicTypeId` in relationship rows.
const CHARACTERISTIC_TYPE_INDEX: usize = 8;

/// Description type of text definitions.
pub const DEFINITION: &str = "900000000000550004";

/// Position of `typeId` in description rows.
const DESCRIPTION_TYPE_INDEX: usize = 6;

const CONCEPT_HEADER: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "definitionStatusId",
];

const DESCRIPTION_HEADER: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "conceptId",
    "languageCode",
    "typeId",
    "term",
    "caseSignificanceId",
];

const RELATIONSHIP_HEADER: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "sourceId",
    "destinationId",
    "relationshipGroup",
    "typeId",
    "characteristicTypeId",
    "modifierId",
];

const OWL_EXPRESSION_HEADER: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "refsetId",
    "referencedComponentId",
    "owlExpression",
];

const SIMPLE_REFSET_HEADER: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "refsetId",
    "referencedComponentId",
];

const LANGUAGE_HEADER: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "refsetId",
    "referencedComponentId",
    "acceptabilityId",
];

const ASSOCIATION_HEADER: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "refsetId",
    "referencedComponentId",
    "targetComponentId",
];

const ATTRIBUTE_VALUE_HEADER: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "refsetId",
    "referencedComponentId",
    "valueId",
];

const SIMPLE_MAP_HEADER: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "refsetId",
    "referencedComponentId",
    "mapTarget",
];

/// How the `id` column of a content type is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierScheme {
    /// SNOMED CT identifier with a Verhoeff check digit.
    Sctid,
    /// Reference set member UUID.
    Uuid,
}

/// The schema identity of an RF2 content file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContentType {
    Concept,
    Description,
    TextDefinition,
    Relationship,
    StatedRelationship,
    OwlExpressionRefset,
    LanguageRefset,
    SimpleRefset,
    AssociationRefset,
    AttributeValueRefset,
    SimpleMapRefset,
}

impl ContentType {
    pub const ALL: [Self; 11] = [
        Self::Concept,
        Self::Description,
        Self::TextDefinition,
        Self::Relationship,
        Self::StatedRelationship,
        Self::OwlExpressionRefset,
        Self::LanguageRefset,
        Self::SimpleRefset,
        Self::AssociationRefset,
        Self::AttributeValueRefset,
        Self::SimpleMapRefset,
    ];

    /// The name used in RF2 file names (`sct2_<name>_…`, `der2_cRefset_<name>…`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Concept => "Concept",
            Self::Description => "Description",
            Self::TextDefinition => "TextDefinition",
            Self::Relationship => "Relationship",
            Self::StatedRelationship => "StatedRelationship",
            Self::OwlExpressionRefset => "OWLExpression",
            Self::LanguageRefset => "Language",
            Self::SimpleRefset => "Simple",
            Self::AssociationRefset => "Association",
            Self::AttributeValueRefset => "AttributeValue",
            Self::SimpleMapRefset => "SimpleMap",
        }
    }

    /// The header a conforming file of this type must start with.
    #[must_use]
    pub fn header_spec(self) -> &'static [&'static str] {
        match self {
            Self::Concept => CONCEPT_HEADER,
            Self::Description | Self::TextDefinition => DESCRIPTION_HEADER,
            Self::Relationship | Self::StatedRelationship => RELATIONSHIP_HEADER,
            Self::OwlExpressionRefset => OWL_EXPRESSION_HEADER,
            Self::LanguageRefset => LANGUAGE_HEADER,
            Self::SimpleRefset => SIMPLE_REFSET_HEADER,
            Self::AssociationRefset => ASSOCIATION_HEADER,
            Self::AttributeValueRefset => ATTRIBUTE_VALUE_HEADER,
            Self::SimpleMapRefset => SIMPLE_MAP_HEADER,
        }
    }

    /// [`header_spec`](Self::header_spec) as owned strings.
    #[must_use]
    pub fn header(self) -> Vec<String> {
        self.header_spec().iter().map(|c| (*c).to_owned()).collect()
    }

    #[must_use]
    pub fn is_refset(self) -> bool {
        matches!(
            self,
            Self::OwlExpressionRefset
                | Self::LanguageRefset
                | Self::SimpleRefset
                | Self::AssociationRefset
                | Self::AttributeValueRefset
                | Self::SimpleMapRefset
        )
    }

    #[must_use]
    pub fn identifier_scheme(self) -> IdentifierScheme {
        if self.is_refset() {
            IdentifierScheme::Uuid
        } else {
            IdentifierScheme::Sctid
        }
    }

    /// Whether a source row belongs in a file of this type.
    ///
    /// Inferred and stated relationships share one header, so source rows are
    /// routed by their characteristic type. Descriptions and text definitions
    /// also share one, and are routed by their description type.
    #[must_use]
    pub fn filter(self, row: &[String]) -> bool {
        let has = |index: usize, value: &str| row.get(index).is_some_and(|c| c == value);
        match self {
            Self::Relationship => !has(CHARACTERISTIC_TYPE_INDEX, STATED_RELATIONSHIP),
            Self::StatedRelationship => has(CHARACTERISTIC_TYPE_INDEX, STATED_RELATIONSHIP),
            Self::Description => !has(DESCRIPTION_TYPE_INDEX, DEFINITION),
            Self::TextDefinition => has(DESCRIPTION_TYPE_INDEX, DEFINITION),
            _ => true,
        }
    }

    /// Recognize content type and release type from an RF2 file name such as
    /// `sct2_Concept_Snapshot_INT_20200131.txt` or
    /// `der2_cRefset_LanguageDelta-en_INT_20200131.txt`.
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<(Self, ReleaseType)> {
        let stem = file_name.strip_suffix(".txt").unwrap_or(file_name);
        let mut parts = stem.split('_');
        let file_type = parts.next()?;
        if file_type != "sct2" && file_type != "der2" {
            return None;
        }
        let mut element = parts.next()?;
        let refset_pattern = element.ends_with("Refset");
        if refset_pattern {
            element = parts.next()?;
        }
        // drop the language suffix, e.g. `Snapshot-en`
        let element = element.split('-').next()?;

        if refset_pattern {
            // `<Name><ReleaseType>` in a single token
            ReleaseType::ALL.into_iter().find_map(|release| {
                let name = element.strip_suffix(release.as_str())?;
                Self::ALL
                    .into_iter()
                    .find(|t| t.is_refset() && t.as_str() == name)
                    .map(|t| (t, release))
            })
        } else {
            let content_type = Self::ALL
                .into_iter()
                .find(|t| !t.is_refset() && t.as_str() == element)?;
            let release = parts.next()?.split('-').next()?.parse().ok()?;
            Some((content_type, release))
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = Rf2Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Rf2Error::UnknownContentType(s.to_owned()))
    }
}
