//! Short-form replies: greeting, question, request, conversational, clarify

use super::phrases::{
    conversation_bank, insight_bank, recommendation_bank, Vars, FOLLOW_UP_OFFER,
    GREETING_AFTER_HOURS, GREETING_BUSINESS_HOURS, GREETING_HEADLINE, GREETING_OFFER,
    GREETING_WEEKEND, REQUEST_ACK, REQUEST_CLOSING, REQUEST_CONTEXT, SEGMENT_INSIGHT,
};
use super::ComposeContext;
use crate::chat::ToneMode;
use rand::Rng;

/// Text plus the facts and advice it was built from
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reply {
    pub text: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn greeting<R: Rng + ?Sized>(ctx: &ComposeContext<'_>, rng: &mut R) -> Reply {
    let vars = Vars::from_figures(&ctx.figures);
    let headline = vars.fill(GREETING_HEADLINE.pick(ctx.mode, rng));

    let day_bank = if ctx.time.is_weekend() {
        &GREETING_WEEKEND
    } else if ctx.time.is_business_hours {
        &GREETING_BUSINESS_HOURS
    } else {
        &GREETING_AFTER_HOURS
    };

    let text = format!(
        "{}! {} {} {}",
        ctx.time.greeting,
        headline,
        day_bank.pick(ctx.mode, rng),
        GREETING_OFFER.pick(ctx.mode, rng)
    );

    Reply {
        text,
        insights: vec![headline],
        recommendations: Vec::new(),
    }
}

pub fn question<R: Rng + ?Sized>(ctx: &ComposeContext<'_>, rng: &mut R) -> Reply {
    let topic = ctx.analysis.primary_topic();
    let vars = Vars::from_figures(&ctx.figures);
    let mut insight = vars.fill(insight_bank(topic).pick(ctx.mode, rng));
    if let Some(segment) = ctx.segment {
        let vars = vars.with_segment(segment, &ctx.figures);
        insight = format!("{} {}", vars.fill(SEGMENT_INSIGHT.pick(ctx.mode, rng)), insight);
    }
    let recommendation = recommendation_bank(topic).pick(ctx.mode, rng).to_string();

    Reply {
        text: format!(
            "{}\n\n{}\n\n{}",
            insight,
            recommendation,
            FOLLOW_UP_OFFER.pick(ctx.mode, rng)
        ),
        insights: vec![insight],
        recommendations: vec![recommendation],
    }
}

pub fn request<R: Rng + ?Sized>(ctx: &ComposeContext<'_>, rng: &mut R) -> Reply {
    let vars = Vars::from_figures(&ctx.figures);
    let context = vars.fill(REQUEST_CONTEXT.pick(ctx.mode, rng));
    let recommendation = recommendation_bank(ctx.analysis.primary_topic())
        .pick(ctx.mode, rng)
        .to_string();

    Reply {
        text: format!(
            "{} {}\n\n{}\n\n{}",
            REQUEST_ACK.pick(ctx.mode, rng),
            context,
            recommendation,
            REQUEST_CLOSING.pick(ctx.mode, rng)
        ),
        insights: vec![context],
        recommendations: vec![recommendation],
    }
}

pub fn conversational<R: Rng + ?Sized>(ctx: &ComposeContext<'_>, rng: &mut R) -> Reply {
    let vars = Vars::from_figures(&ctx.figures);
    Reply {
        text: vars.fill(conversation_bank(ctx.analysis.sentiment).pick(ctx.mode, rng)),
        ..Reply::default()
    }
}

/// Deterministic prompt for more detail
pub fn clarify(mode: ToneMode) -> Reply {
    Reply {
        text: clarify_text(mode).to_string(),
        ..Reply::default()
    }
}

pub fn clarify_text(mode: ToneMode) -> &'static str {
    mode.pick(
        "I did not catch a question there. Could you give me a more specific request? \
         For example, ask about your customers, revenue or campaigns.",
        "You sent me a whole lot of nothing! Give me a more specific request and I will \
         pounce on it. Customers, revenue, campaigns: pick your adventure.",
    )
}
