//! Landing page content and slide extraction.
//!
//! The page is a JSON document of the shape
//! `{ "pages": [ { "components": [ { "id", "type", "props" } ] } ] }`,
//! the same document the edit form works on.

use crate::error::{AppError, Result};
use serde_json::{Value, json};
use std::path::Path;

const PLACEHOLDER_IMAGE: &str = "/placeholder.webp";
const BLOB_BASE: &str =
    "https://maf7vdyjaxjtyxfd.public.blob.vercel-storage.com/users/692bbf5c91423b9780010fe4";

/// Component type of the autoplaying hero banner.
pub const HERO_COMPONENT: &str = "carouselHero";
/// Component type of the expandable image gallery.
pub const GALLERY_COMPONENT: &str = "gridCarousel";

/// One image in a slide deck.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub image_ref: String,
    pub image_alt_text: String,
    pub caption: Option<String>,
}

impl Slide {
    pub fn new(image_ref: impl Into<String>, image_alt_text: impl Into<String>) -> Self {
        Self {
            image_ref: image_ref.into(),
            image_alt_text: image_alt_text.into(),
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Slides shown when a deck is given nothing to show.
pub fn placeholder_slides() -> Vec<Slide> {
    (1..=4)
        .map(|n| Slide::new(PLACEHOLDER_IMAGE, format!("Image {}", n)))
        .collect()
}

/// Reads a page document from disk.
pub fn load_site_content(path: &Path) -> Result<Value> {
    let json = std::fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&json)?;
    if components(&document).is_none() {
        return Err(AppError::ContentLoad(format!(
            "{}: missing pages[0].components",
            path.display()
        )));
    }
    Ok(document)
}

/// Components of the first page, if the document has any.
pub fn components(document: &Value) -> Option<&Vec<Value>> {
    document.pointer("/pages/0/components")?.as_array()
}

/// Props of the first component of `component_type`.
pub fn component_props<'a>(document: &'a Value, component_type: &str) -> Option<&'a Value> {
    components(document)?
        .iter()
        .find(|c| c.get("type").and_then(Value::as_str) == Some(component_type))
        .and_then(|c| c.get("props"))
}

/// Extracts the slides of the first component of `component_type`.
///
/// Items without an image source are skipped. An empty result is left for the
/// deck to replace with placeholders.
pub fn slides_for(document: &Value, component_type: &str) -> Vec<Slide> {
    let Some(items) = component_props(document, component_type)
        .and_then(|props| props.get("items"))
        .and_then(Value::as_array)
    else {
        log::warn!("No slide items found for component {}", component_type);
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let image = item.get("image")?;
            let src = image.get("src")?.as_str()?;
            let alt = image.get("alt").and_then(Value::as_str).unwrap_or_default();
            let slide = Slide::new(src, alt);
            Some(match item.get("description").and_then(Value::as_str) {
                Some(caption) if !caption.is_empty() => slide.with_caption(caption),
                _ => slide,
            })
        })
        .collect()
}

fn blob(name: &str) -> String {
    format!("{}/{}", BLOB_BASE, name)
}

/// The landing page as shipped.
pub fn default_site_content() -> Value {
    json!({
        "pages": [{
            "id": "home",
            "components": [
                {
                    "id": "hero",
                    "type": HERO_COMPONENT,
                    "props": {
                        "title": "Attention to Detail is the Key! No other Cleaning will do.",
                        "description": "I specialize in customized cleaning solutions with a personal touch and comparable prices.",
                        "buttonText": "Get Started",
                        "items": [
                            {
                                "image": { "src": blob("20230225_154832_resized-bmZv5sMrMjfwPHyNHU7gLqH1dyMiN5.jpg"), "alt": "Barb holding a bird" },
                                "description": "Pet friendly cleaning services"
                            },
                            {
                                "image": { "src": blob("20180815_084631_resized-5sBNryIVUI6tFavIaKjfwaZx2JJcxx.jpg"), "alt": "Clean and organized home space" },
                                "description": "Come home to a spotless sanctuary, your stress melts away"
                            },
                            {
                                "image": { "src": blob("20180815_084605_resized-5U3djxW6WBu2pk4VaBMf0DNJ7Gp6QN.jpg"), "alt": "Professional cleaning service in action" },
                                "description": "Over 20+ years of house cleaning experience, building lasting client relationships."
                            },
                            {
                                "image": { "src": blob("20180815_084605_resized-xvW80LnskvtXcrpv5qcD0DEvadFCoL.jpg"), "alt": "Sparkling clean kitchen" },
                                "description": "I clean your house and take away your dirt"
                            },
                            {
                                "image": { "src": blob("20230428_111518_resized%281%29-DZIejTOayAlmTIKbRLiKf4mcwvOXJL.jpg"), "alt": "Dog at the top of the stairs" },
                                "description": "Pet friendly cleaning services"
                            }
                        ]
                    }
                },
                {
                    "id": "about",
                    "type": "experienceCard",
                    "props": {
                        "title": "Why Choose BTQ Cleaning Services?",
                        "subTitle": "No other Cleaning will do!",
                        "description": "With over 20+ years of cleaning experience, I've built lasting relationships with clients who have become friends and family.",
                        "buttonText": "Learn More",
                        "array": [
                            { "title": "Personalized Cleaning Plans" },
                            { "title": "Eco-Friendly & Pet-Safe Products" },
                            { "title": "Bonded, Insured & Reliable" },
                            { "title": "The Pet Whisper" },
                            { "title": "All Ages Welcome" }
                        ]
                    }
                },
                {
                    "id": "features",
                    "type": "textAndList",
                    "props": {
                        "title": "Discover the BTQ Cleaning Services Difference",
                        "description": "I clean your home the way you want. Every home and owner is different.",
                        "textArray": [
                            { "title": "Customized for Every Home", "description": "I tailor my approach to match your specific preferences and needs." },
                            { "title": "20+ Years of Experience", "description": "Most clients come from referrals and word of mouth." },
                            { "title": "Advanced Equipment", "description": "A professional vacuum backpack cleaner with 3 filters keeps dust out of your home." }
                        ]
                    }
                },
                {
                    "id": "services",
                    "type": "featureBoxes",
                    "props": {
                        "title": "My Services",
                        "description": "Every home is unique, and so is my cleaning service.",
                        "array": [
                            { "title": "Regular Home Cleaning", "description": "Attention to detail for every room in your home, customized to your preferences." },
                            { "title": "Deep Cleaning", "description": "Seasonal detail cleaning for windows, baseboards, appliances and cupboards." },
                            { "title": "Move-In/Move-Out Cleaning", "description": "Your space spotless and ready for your new beginning." }
                        ]
                    }
                },
                {
                    "id": "faq",
                    "type": "accordion",
                    "props": {
                        "title": "Frequently Asked Questions",
                        "description": "Here are some common questions I receive from my clients.",
                        "array": [
                            { "title": "What areas do you serve?", "description": "Neighborhoods throughout Halifax and surrounding areas." },
                            { "title": "Do you bring your own supplies?", "description": "Yes! I bring all necessary supplies, including eco-friendly and pet-friendly products." },
                            { "title": "How do I book a service?", "description": "Call 902-220-1089, email btqcleaningservices@gmail.com, or message me on Facebook." }
                        ]
                    }
                },
                {
                    "id": "gallery",
                    "type": GALLERY_COMPONENT,
                    "props": {
                        "subTitle": "BTQ Cleaning Services Gallery",
                        "title": "Transformations I Create",
                        "description": "Browse through my gallery to see the clean spaces I have achieved for my clients.",
                        "items": [
                            { "image": { "src": blob("20180815_084631_resized-ManjhNN4PIatLWjgdCahwOLNhzNlgS.jpg"), "alt": "Clean and organized living space" } },
                            { "image": { "src": blob("20180815_084654_resized-1lBcw6JvrJFAct1aVahh77sTOTwCae.jpg"), "alt": "Kitchen cleaning" } },
                            { "image": { "src": blob("20180815_084848_resized-Lcvt64PSXzOKpzBLwWKg14Gn79ReqA.jpg"), "alt": "Sparkling clean home interior" } },
                            { "image": { "src": blob("20180815_084605_resized-yt5zbS0MrJnxWrC7ibNlIm50JW3t6K.jpg"), "alt": "Deep cleaning result" } },
                            { "image": { "src": blob("20250603_092053-PREzMSBbfdQ1iRhjCKgvycGxelqg3C.jpg"), "alt": "Transformation result" } },
                            { "image": { "src": blob("20180815_085215_resized-pzfwJ2Z80eLTnKe1BTfkBCu8UUPMV9.jpg"), "alt": "Bathroom cleaning" } }
                        ]
                    }
                },
                {
                    "id": "testimonials",
                    "type": "testimonials3",
                    "props": {
                        "title": "Client Testimonials",
                        "testimonials": [
                            { "name": "Sarah L.", "role": "Homeowner", "quote": "BTQ transformed my home! I couldn't be happier with the results." },
                            { "name": "Mark T.", "role": "Business Owner", "quote": "Dependable and thorough! They always exceed my expectations." },
                            { "name": "Emily R.", "role": "Client", "quote": "I love coming home to a clean house." }
                        ]
                    }
                },
                {
                    "id": "contact",
                    "type": "contactCloser",
                    "props": {
                        "title": "Ready for a Spotless Home?",
                        "description": "Contact me today to schedule your free consultation.",
                        "buttonText": "Get in Touch",
                        "email": "btqcleaningservices@gmail.com",
                        "phone": "902-220-1089"
                    }
                }
            ]
        }]
    })
}
