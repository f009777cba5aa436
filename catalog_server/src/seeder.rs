//! Built-in catalog used for demo mode and first-time setup.
//!
//! Idempotent: products whose slug already exists are skipped.

use uuid::Uuid;

use crate::models::product::NewProduct;
use crate::store::{Store, StoreError};

struct SeedProduct {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    category: &'static str,
    images: &'static [&'static str],
    features: &'static [&'static str],
    material: &'static str,
    finish: &'static str,
    application: &'static str,
    compatibility: &'static str,
}

const CATALOG: &[SeedProduct] = &[
    SeedProduct {
        name: "Immersive Interactive Experience Pod",
        slug: "immersive-interactive-experience-pod",
        description: "An immersive interactive experience pod for engaging, multi-sensory digital environments: \
                      a circular LED-lit arch, a vertical display backdrop and a central touch kiosk on a glass floor panel.",
        category: "Interactive Installation / Digital Experience Zone",
        images: &[
            "/product-static-assets/immersive-interactive-experience-pod/70dca54d-0bbd-4dd4-9340-d5ea52946e8a.JPG",
            "/product-static-assets/immersive-interactive-experience-pod/8ecd88b7-2409-4f61-91c6-bcc76e1268e1.JPG",
        ],
        features: &[
            "Circular arch structure with integrated LED lighting",
            "High-resolution vertical digital display backdrop",
            "Central interactive touch kiosk for user engagement",
            "Glass floor panel for enhanced immersive effect",
            "Modular platform design for easy installation",
        ],
        material: "Metal Structure with Glass & Acrylic Panels",
        finish: "Matte Black with LED Accent Lighting",
        application: "Experience Centers / Exhibitions / Corporate Spaces / Public Installations",
        compatibility: "Interactive Touch Kiosk, LED Display Panels, Sensor-Based Systems",
    },
    SeedProduct {
        name: "Smart Interactive Kiosk Enclosure",
        slug: "smart-interactive-kiosk-enclosure",
        description: "An industrial-grade kiosk enclosure for high-traffic commercial spaces, with a curved arch \
                      frame and an open front for touch displays, internal hardware and cable management.",
        category: "Interactive Display Stand / Digital Kiosk",
        images: &[
            "/product-static-assets/smart-interactive-kiosk-enclosure/IMG_20210129_162256_Original.JPG",
            "/product-static-assets/smart-interactive-kiosk-enclosure/IMG_20210129_162318_Original.JPG",
        ],
        features: &[
            "Heavy-duty metal construction for long-term durability",
            "Curved arch frame for structural support",
            "Powder-coated finish for corrosion resistance",
            "Front-access display mounting for easy maintenance",
        ],
        material: "Mild Steel / Metal Fabricated Body",
        finish: "Powder Coated (Matte Grey & Black)",
        application: "Commercial / Retail / Corporate / Public Spaces",
        compatibility: "Touch Displays & Embedded Systems (Custom Mount Support)",
    },
    SeedProduct {
        name: "Flip-Down Ceiling TV Mount",
        slug: "flip-down-ceiling-tv-mount",
        description: "A space-saving flip-down ceiling mount for flat and pitched ceilings. A scissor-arm \
                      mechanism flips the display down for viewing and folds it up when not in use.",
        category: "Ceiling Mount / Display Mount",
        images: &[
            "/product-static-assets/flip-down-ceiling-tv-mount/41RuSwUlyzL.jpg",
            "/product-static-assets/flip-down-ceiling-tv-mount/41jpYlfmfAL-400x400.jpg",
        ],
        features: &[
            "Fits both flat and pitched ceilings",
            "Flip-down and fold-up mechanism saves space",
            "Strong scissor arm for stable support",
            "Secure locking system for safe operation",
        ],
        material: "Heavy-Duty Steel",
        finish: "Powder Coated (Black)",
        application: "Residential / Commercial / Education / Corporate",
        compatibility: "VESA Compatible Flat Panel Displays",
    },
    SeedProduct {
        name: "Full Motion Adjustable Monitor Arm",
        slug: "full-motion-adjustable-monitor-arm",
        description: "A fully adjustable, clamp-mounted monitor arm with smooth swivel, tilt and rotation \
                      for ergonomic workstation setups.",
        category: "Monitor Mount / Desk Mount",
        images: &[
            "/product-static-assets/full-motion-adjustable-monitor-arm/gas-monitor-arm-360-degree-rotation-500x500-2.webp",
        ],
        features: &[
            "180° swivel for easy screen sharing",
            "360° rotation for landscape or portrait mode",
            "Tilt adjustment from -35° to +50°",
            "Desk clamp base for secure installation",
            "Integrated cable management",
        ],
        material: "High-Strength Aluminum Alloy & Steel",
        finish: "Matte Black Powder Coated",
        application: "Office / Home Workspace / Corporate / Studio",
        compatibility: "VESA Compatible Monitors (75x75 / 100x100)",
    },
    SeedProduct {
        name: "Heavy-Duty Mobile LED Display Stand",
        slug: "heavy-duty-mobile-led-display-stand",
        description: "A mobile stand for large-format LED and flat-panel displays, with a wide steel base \
                      and lockable casters for secure repositioning.",
        category: "Mobile Display Stand / Video Wall Stand",
        images: &[
            "/product-static-assets/heavy-duty-mobile-led-display-stand/audiovan-low-height-director-tv-trolly-with-wheels-for-32-inch-to-75-inch-led-500x500-1.webp",
        ],
        features: &[
            "Heavy-duty construction for large and heavy displays",
            "Wide base design for superior stability",
            "Lockable caster wheels",
            "Custom size and load capacity options available",
        ],
        material: "High-Strength Steel Frame",
        finish: "Powder Coated (Matte Black)",
        application: "Corporate / Events / Exhibition / Control Rooms",
        compatibility: "Large LED & Flat Panel Displays (VESA Mount Support)",
    },
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl SeedProduct {
    fn to_new_product(&self) -> NewProduct {
        NewProduct {
            id: Uuid::new_v4(),
            name: self.name.to_string(),
            title: self.name.to_string(),
            slug: self.slug.to_string(),
            description: self.description.to_string(),
            category: Some(self.category.to_string()),
            images: strings(self.images),
            why_this_product: String::new(),
            what_does_it_do: String::new(),
            features: strings(self.features),
            use_cases: Vec::new(),
            sku: String::new(),
            vesa: String::new(),
            max_weight: String::new(),
            screen_size: String::new(),
            adjustments: String::new(),
            technical_drawing: String::new(),
            installation_manual: String::new(),
            technical_data_sheet: String::new(),
            brochure: String::new(),
            material: self.material.to_string(),
            certifications: Vec::new(),
            video_url: String::new(),
            fusion_url: String::new(),
            application: self.application.to_string(),
            compatibility: self.compatibility.to_string(),
            finish: self.finish.to_string(),
            published: true,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Load the built-in catalog into `store`.
pub async fn seed_catalog(store: &dyn Store) -> anyhow::Result<SeedReport> {
    let mut report = SeedReport::default();

    for seed in CATALOG {
        if store.find_product_by_slug(seed.slug).await?.is_some() {
            report.skipped += 1;
            continue;
        }
        match store.insert_product(seed.to_new_product()).await {
            Ok(_) => report.inserted += 1,
            Err(StoreError::Conflict { .. }) => report.skipped += 1,
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(
        inserted = report.inserted,
        skipped = report.skipped,
        "Built-in catalog seeded"
    );
    Ok(report)
}
