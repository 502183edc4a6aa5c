use crate::category::keywords::DEFAULT_RULES;
use crate::models::{Category, ClassifiedProduct, Product};

/// Ordered `(category, keywords)` rules evaluated first-match-wins.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<(Category, Vec<String>)>,
}

impl Default for Classifier {
    fn default() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .map(|(category, words)| (*category, words.iter().map(|w| fold(w)).collect()))
            .collect();
        Classifier { rules }
    }
}

impl Classifier {
    /// Append extra keywords to existing categories. Priority order is kept;
    /// keywords for the fallback category are ignored since it never matches
    /// by keyword.
    pub fn with_extra_keywords(mut self, extra: &[(Category, Vec<String>)]) -> Self {
        for (category, words) in extra {
            if let Some((_, keywords)) = self.rules.iter_mut().find(|(c, _)| c == category) {
                keywords.extend(
                    words
                        .iter()
                        .map(|w| fold(w))
                        .filter(|w| !w.trim().is_empty()),
                );
            } else {
                tracing::warn!(category = %category, "ignoring keywords for fallback category");
            }
        }
        self
    }

    /// Assign a category to a product name. Total and deterministic: the first
    /// rule with a keyword contained in the name wins, else [`Category::Other`].
    pub fn classify(&self, name: &str) -> Category {
        let haystack = format!(" {} ", fold(name));
        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k.as_str())))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }

    /// Tag every product with its category, preserving input order.
    pub fn classify_all(&self, products: Vec<Product>) -> Vec<ClassifiedProduct> {
        products
            .into_iter()
            .map(|product| {
                let category = self.classify(&product.name);
                ClassifiedProduct { product, category }
            })
            .collect()
    }
}

/// Lowercase `text` and turn punctuation into spaces, so `"Dell-Inspiron"`
/// and `"dell inspiron"` compare equal. Names and keywords are both folded.
fn fold(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(name: &str) -> Category {
        Classifier::default().classify(name)
    }

    #[test]
    fn test_health_and_beauty() {
        assert_eq!(
            classify("NIVEA Antiperspirant Spray for Women"),
            Category::HealthBeauty
        );
    }

    #[test]
    fn test_unmatched_falls_back() {
        assert_eq!(classify("random unmatched widget"), Category::Other);
        assert_eq!(classify(""), Category::Other);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("LENOVO IDEAPAD LAPTOP"), Category::Computing);
        assert_eq!(classify("lenovo ideapad laptop"), Category::Computing);
    }

    #[test]
    fn test_one_name_per_category() {
        let cases = [
            ("Men's Cotton Polo T-Shirt", Category::Fashion),
            ("Xiaomi Redmi Note 12 Smartphone", Category::PhonesTablets),
            ("Tornado Air Fryer 4 Litre", Category::Appliances),
            ("Pampers Baby-Dry Diapers Size 4", Category::BabyProducts),
            ("SanDisk 64GB USB Flash Drive", Category::Computing),
            ("Sony PlayStation 5 DualSense Controller", Category::Gaming),
            ("Orthopedic Memory Foam Pillow", Category::HomeFurniture),
            ("Nescafe Classic Instant Coffee 200g", Category::Supermarket),
            ("JBL Portable Bluetooth Speaker", Category::TelevisionAudio),
        ];
        for (name, expected) in cases {
            assert_eq!(classify(name), expected, "{}", name);
        }
    }

    #[test]
    fn test_priority_order_resolves_overlap() {
        // "watch" (Fashion) and "galaxy" (Phones & Tablets): Fashion is earlier
        assert_eq!(classify("Samsung Galaxy Watch 5"), Category::Fashion);
        // "coffee maker" (Appliances) beats "coffee" (Supermarket)
        assert_eq!(classify("Black+Decker Coffee Maker"), Category::Appliances);
    }

    #[test]
    fn test_word_boundary_keywords() {
        assert_eq!(classify("Samsung 43 inch TV"), Category::TelevisionAudio);
        assert_eq!(classify("Office Chair with Armrest"), Category::HomeFurniture);
        assert_eq!(classify("Dell Inspiron 15"), Category::Computing);
    }

    #[test]
    fn test_punctuation_is_a_word_edge() {
        assert_eq!(classify("Dell-Inspiron 15"), Category::Computing);
        assert_eq!(classify("LG 32\"/TV"), Category::TelevisionAudio);
        assert_eq!(classify("Hisense 43-TV Full HD"), Category::TelevisionAudio);
        assert_eq!(classify("L'OREAL Revitalift Day Cream"), Category::HealthBeauty);
        assert_eq!(classify("L'Oreal Elvive"), Category::HealthBeauty);
        // still no match inside a word
        assert_eq!(classify("Antvillage Figurine"), Category::Other);
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("T-Shirt (XL)"), "t shirt  xl ");
        assert_eq!(fold("l'oreal"), "l oreal");
        assert_eq!(fold(" tv"), " tv");
    }

    #[test]
    fn test_deterministic() {
        let name = "Garnier Micellar Water 400ml";
        let first = classify(name);
        for _ in 0..10 {
            assert_eq!(classify(name), first);
        }
    }

    #[test]
    fn test_extra_keywords_extend_a_category() {
        let classifier = Classifier::default()
            .with_extra_keywords(&[(Category::Gaming, vec!["Steam Deck".to_string()])]);
        assert_eq!(classifier.classify("Valve Steam Deck 512GB"), Category::Gaming);
        assert_eq!(classifier.classify("Valve Steam-Deck OLED"), Category::Gaming);
        assert_eq!(classify("Valve Steam Deck 512GB"), Category::Other);
    }

    #[test]
    fn test_classify_all_preserves_order() {
        let product = |id: &str, name: &str| Product {
            id: id.to_string(),
            name: name.to_string(),
            price: 1.0,
            reviews: None,
            rating: None,
        };
        let tagged = Classifier::default().classify_all(vec![
            product("a", "Dove Body Wash"),
            product("b", "mystery box"),
        ]);
        assert_eq!(tagged[0].product.id, "a");
        assert_eq!(tagged[0].category, Category::HealthBeauty);
        assert_eq!(tagged[1].category, Category::Other);
    }
}
