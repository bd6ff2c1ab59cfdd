//! Markdown rendering for the product catalog.

use crate::catalog::product::DisplayProduct;

/// Heading line of the rendered catalog document.
pub const CATALOG_HEADING: &str = "### Product Catalog";

/// Render products as a single Markdown document.
///
/// One ordinal block per product, numbered from 1, in input order. An empty
/// slice yields `None` rather than a bare heading; callers treat "nothing
/// retrieved" and "zero products" the same way.
pub fn render_markdown(products: &[DisplayProduct]) -> Option<String> {
    if products.is_empty() {
        return None;
    }

    let mut output = format!("{CATALOG_HEADING}\n\n");
    for (idx, product) in products.iter().enumerate() {
        output.push_str(&format!("**{}. {}**\n", idx + 1, product.name));
        output.push_str(&format!("- **Description**: {}\n", product.description));
        output.push_str(&format!("- **Image**:\n\n  ![Image]({})\n\n", product.image));
    }

    Some(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str) -> DisplayProduct {
        DisplayProduct {
            name: name.to_string(),
            description: format!("Luxury product - Bag: {name}"),
            image: format!("https://x/{name}.jpg"),
        }
    }

    #[test]
    fn test_render_empty_is_none() {
        assert_eq!(render_markdown(&[]), None);
    }

    #[test]
    fn test_render_single_product() {
        let doc = render_markdown(&[product("Red Tote")]).unwrap();
        assert!(doc.starts_with(CATALOG_HEADING));
        assert!(doc.contains("**1. Red Tote**"));
        assert!(doc.contains("- **Description**: Luxury product - Bag: Red Tote"));
        assert!(doc.contains("![Image](https://x/Red Tote.jpg)"));
    }

    #[test]
    fn test_render_ordinals_follow_input_order() {
        let products = vec![product("First"), product("Second"), product("Third")];
        let doc = render_markdown(&products).unwrap();

        let first = doc.find("**1. First**").unwrap();
        let second = doc.find("**2. Second**").unwrap();
        let third = doc.find("**3. Third**").unwrap();
        assert!(first < second && second < third);

        // Exactly one block per product
        assert_eq!(doc.matches("- **Image**:").count(), 3);
        assert!(!doc.contains("**4."));
    }
}
