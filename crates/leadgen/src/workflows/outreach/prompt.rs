use crate::workflows::leads::QualifiedLead;

pub(crate) const SYSTEM_PROMPT: &str = "You are an expert B2B sales copywriter who writes concise, \
personalized cold emails that get replies.";

pub(crate) fn build_prompt(lead: &QualifiedLead) -> String {
    let details = &lead.lead;
    let or_unknown =
        |value: &Option<String>| value.clone().unwrap_or_else(|| "Unknown".to_string());

    format!(
        "Write a personalized cold outreach email for the following lead.

LEAD INFORMATION:
- Name: {name}
- Title: {title}
- Company: {company}
- Industry: {industry}
- Funding Stage: {funding}
- ICP Score: {score}/100

OUR OFFER:
We build AI-powered lead generation systems that deliver 400+ qualified leads per week, \
fully automated. We replace manual prospecting that typically costs sales teams 20-40 hours per week.

EMAIL RULES:
- Subject line: short, curiosity-driven, no clickbait
- Opening: reference something specific about their company or role
- Value prop: one clear sentence on what we do and the outcome
- Social proof: mention \"sales teams at Series B-G companies\"
- CTA: ask for a 20-minute call, keep it low pressure
- Tone: confident, peer-to-peer, not salesy
- Length: 5-7 sentences max, no fluff
- No em-dashes

Respond in this exact format:
SUBJECT: <subject line here>
BODY: <email body here>",
        name = details.contact_name,
        title = or_unknown(&details.contact_title),
        company = or_unknown(&details.company_name),
        industry = details.industry.as_deref().unwrap_or("B2B SaaS"),
        funding = details.funding_stage.as_deref().unwrap_or("Growth stage"),
        score = lead.qualification_score,
    )
}

/// Subject and body extracted from a generated reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedDraft {
    pub subject: String,
    pub body: String,
}

/// Parse the two-field `SUBJECT:` / `BODY:` reply.
///
/// Lines after `BODY:` continue the body. Returns `None` when either field is
/// missing or empty.
pub(crate) fn parse_draft(raw: &str) -> Option<ParsedDraft> {
    let mut subject: Option<String> = None;
    let mut body: Option<String> = None;

    for line in raw.trim().lines() {
        if let Some(rest) = line.strip_prefix("SUBJECT:") {
            subject = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("BODY:") {
            body = Some(rest.trim().to_string());
        } else if let Some(body) = body.as_mut() {
            body.push('\n');
            body.push_str(line);
        }
    }

    let subject = subject.filter(|subject| !subject.is_empty())?;
    let body = body
        .map(|body| body.trim().to_string())
        .filter(|body| !body.is_empty())?;

    Some(ParsedDraft { subject, body })
}
