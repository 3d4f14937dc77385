//! Preview handler
//!
//! Runs the visitor-facing engine for a simulated request.

use super::super::{ArgProcessor, CliContext, RequestArgs};
use anyhow::Result;
use promo_footer_bar::notifications::dismissal;

/// Handler for eligibility and render previews
pub struct RenderHandler<'a> {
    context: &'a CliContext,
}

impl<'a> RenderHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    pub fn handle_eligible(&self, args: &RequestArgs) -> Result<()> {
        let request = ArgProcessor::new().page_request(args, None)?;
        let footer_bar = self.context.footer_bar(self.context.repository())?;
        let eligible = footer_bar.eligible(&request)?;

        if eligible.is_empty() {
            println!("No eligible notifications");
            return Ok(());
        }

        let probability = 100.0 / eligible.len() as f64;
        for record in &eligible {
            println!(
                "{:>5.1}%  {}  ({})",
                probability,
                record.title,
                dismissal::cookie_name(record)
            );
        }

        Ok(())
    }

    /// Print the banner for one page view; prints nothing when no banner
    /// would be shown
    pub fn handle_render(&self, args: &RequestArgs, cookie: Option<&str>, page: bool) -> Result<()> {
        let request = ArgProcessor::new().page_request(args, cookie)?;
        let footer_bar = self.context.footer_bar(self.context.repository())?;

        if page {
            let fragments = footer_bar.render_page(&request);
            println!("<!-- head -->{}", fragments.head);
            println!("<!-- footer -->{}", fragments.footer);
        } else if let Some(html) = footer_bar.render_notification(&request) {
            print!("{html}");
        }

        Ok(())
    }
}

super::traits::impl_context_handler!(RenderHandler);
