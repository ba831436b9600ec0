use crate::core::config::data::Config;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.backend_url {
            Some(url) => println!("  backend-url: {url}"),
            None => println!("  backend-url: (unset)"),
        }
        match self.default_organ {
            Some(organ) => println!("  default-organ: {organ}"),
            None => println!("  default-organ: (unset)"),
        }
        match self.default_image_type {
            Some(image_type) => println!("  default-image-type: {image_type}"),
            None => println!("  default-image-type: (unset)"),
        }
    }
}
