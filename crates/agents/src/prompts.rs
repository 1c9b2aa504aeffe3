//! Prompt templates for the research, marketing, and creative agents.
//!
//! The campaign template is load-bearing: the numbered section list below
//! is the structure the parser's tokenizer and builder expect back from
//! the model.

use crate::llm::GenerationRequest;

const RESEARCH_SYSTEM: &str = "\
You are a company research agent specialized in gathering and analyzing \
information about companies. Provide comprehensive, accurate, and \
well-structured information about the target company.

Follow these guidelines:
1. Break down research into clear categories: basic company information, \
brand voice and communication, market position and competition, target \
audience and customer base.
2. Prioritize reliable and recent information sources.
3. Structure findings in a clear, hierarchical format.
4. Focus on factual, verifiable information and note significant data gaps.";

const QUESTION_SYSTEM: &str = "\
Generate comprehensive research questions about the company, grouped into \
these categories: basic company information (history, leadership, size, \
markets), brand voice (communication style, visual identity, public \
messaging), market position (industry standing, competitive advantages, \
differentiators), and target audience (demographics, personas, segments, \
behavior patterns). Ensure questions are specific and answerable from \
public sources.";

const ANALYSIS_SYSTEM: &str = "\
Analyze the collected company data and produce a structured summary \
covering: company overview, brand voice and personality, market position \
and competitive landscape, and target audience characteristics. Highlight \
gaps or uncertainties explicitly rather than guessing.";

const BRAND_SYSTEM: &str = "\
Analyze the brand voice and personality from the research data. Focus on: \
tone analysis (communication style, language patterns, emotional \
resonance), value proposition (core benefits, unique advantages, brand \
promises), brand identity (visual elements, message consistency), and \
communication strategy (channel preferences, content types, message \
hierarchy). Present findings with clear brand guidelines and tone \
recommendations.";

const AUDIENCE_SYSTEM: &str = "\
Create detailed target audience profiles from the research data. Break \
down the analysis into: demographics (age ranges, income levels, \
locations, professional backgrounds), psychographics (values, lifestyle \
patterns, interests), pain points (current challenges, unmet needs, \
decision barriers), and motivations (goals, purchase drivers, value \
perception). Structure profiles with clear segmentation and behavioral \
insights.";

const MARKET_SYSTEM: &str = "\
Assess market position and competitive advantages from the research data. \
Analyze: industry standing, competitive advantages, unique selling \
propositions, market opportunities, and differentiation factors. Present \
the assessment with concrete positioning recommendations.";

pub fn research_report(company_name: &str, findings: &str) -> GenerationRequest {
    let prompt = if findings.is_empty() {
        format!(
            "Research market opportunities, brand voice, and target audience \
             for {company_name}. Focus on market size, customer needs, and \
             potential strategies."
        )
    } else {
        format!(
            "Research market opportunities, brand voice, and target audience \
             for {company_name}, drawing on these search findings:\n\n{findings}"
        )
    };
    GenerationRequest::with_system(RESEARCH_SYSTEM, prompt)
}

pub fn research_questions(company_name: &str) -> GenerationRequest {
    GenerationRequest::with_system(
        QUESTION_SYSTEM,
        format!("Generate research questions for {company_name}."),
    )
}

pub fn data_analysis(collected_data: &str) -> GenerationRequest {
    GenerationRequest::with_system(
        ANALYSIS_SYSTEM,
        format!("Analyze this collected company data:\n{collected_data}"),
    )
}

pub fn brand_analysis(research_data: &str) -> GenerationRequest {
    GenerationRequest::with_system(
        BRAND_SYSTEM,
        format!("Analyze the brand elements in this research:\n{research_data}"),
    )
}

pub fn audience_mapping(research_data: &str) -> GenerationRequest {
    GenerationRequest::with_system(
        AUDIENCE_SYSTEM,
        format!("Create audience profiles from this research:\n{research_data}"),
    )
}

pub fn market_position(research_data: &str) -> GenerationRequest {
    GenerationRequest::with_system(
        MARKET_SYSTEM,
        format!("Assess the market position in this research:\n{research_data}"),
    )
}

/// The campaign idea template. The numbered sections instruct the model to
/// emit exactly the block structure `parse_campaigns` consumes.
pub fn campaign_generation(
    company_info: &str,
    target_audience: &str,
    brand_values: &str,
    num_campaigns: usize,
) -> GenerationRequest {
    GenerationRequest::new(format!(
        "As a creative marketing director, generate {num_campaigns} unique and \
innovative advertising campaign ideas for the following company:

Company Information:
{company_info}

Target Audience:
{target_audience}

Brand Values:
{brand_values}

For each campaign idea, provide:
1. Campaign Name: A memorable, distinctive title that captures the essence of the campaign
2. Core Message: The primary value proposition or key takeaway for the audience
3. Visual Theme Description: Detailed description of the campaign's visual style, including:
   - Color Palette: suggestions
   - Photography Illustration Style: preferred style
   - Key Visual Elements: recurring imagery
   - Mood and Atmosphere: overall feel
4. Key Emotional Appeal: The primary emotional response the campaign aims to evoke, including:
   - Primary Emotion: the dominant feeling
   - Supporting Psychological Triggers: reinforcing cues
   - Desired Audience Reaction: intended response
5. Social Media Focus: Platform-specific strategy, including:
   - Primary Platforms: e.g. Instagram, LinkedIn, TikTok
   - Content Format Recommendations: post and video formats
   - Engagement Tactics: participation drivers
   - Hashtag Strategy: tags to anchor the campaign
6. Campaign Timeline: Suggested campaign duration and key phases
7. Success Metrics: Specific KPIs and measurement criteria
8. Budget Allocation: Recommended distribution across channels
9. Risk Mitigation: Potential challenges and mitigation strategies

Start each campaign block with a line reading \"Campaign: <name>\". Each \
campaign should have a unique angle and visual style while aligning with \
the brand values and target audience preferences. Format each campaign as \
a structured output with clear sections and detailed subsections."
    ))
}

pub fn tagline(core_message: &str, visual_theme: &str, emotional_appeal: &str) -> GenerationRequest {
    GenerationRequest::new(format!(
        "Create a memorable and impactful tagline for an advertisement \
campaign based on the following elements:

Core Message:
{core_message}

Visual Theme:
{visual_theme}

Emotional Appeal:
{emotional_appeal}

The tagline should be concise (ideally 3-7 words), capture the essence of \
the core message, evoke the desired emotional response, and be distinctive. \
Generate a single, powerful tagline."
    ))
}

pub fn narrative(
    core_message: &str,
    visual_theme: &str,
    emotional_appeal: &str,
) -> GenerationRequest {
    GenerationRequest::new(format!(
        "Create a compelling narrative for an advertisement campaign based \
on the following elements:

Core Message:
{core_message}

Visual Theme:
{visual_theme}

Emotional Appeal:
{emotional_appeal}

The narrative should tell a story that resonates with the target audience, \
incorporate the core message naturally, create vivid imagery aligned with \
the visual theme, and be concise yet impactful (150-200 words)."
    ))
}

pub fn image_prompt(
    campaign_name: &str,
    product_prompt: &str,
    brand_prompt: &str,
    social_prompt: &str,
) -> GenerationRequest {
    GenerationRequest::new(format!(
        "Create a detailed image generation prompt for an advertisement \
campaign titled \"{campaign_name}\" based on the following elements:

Product Focus:
{product_prompt}

Brand Elements:
{brand_prompt}

Social Media Considerations:
{social_prompt}

The final image should be visually striking and professional, clearly \
communicate the intended message, and be suitable for the target \
platforms. Generate a detailed prompt that will produce such an image."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_template_interpolates_count_and_inputs() {
        let request = campaign_generation("EcoTech info", "homeowners", "sustainability", 3);
        assert!(request.prompt.contains("generate 3 unique"));
        assert!(request.prompt.contains("EcoTech info"));
        assert!(request.prompt.contains("1. Campaign Name"));
        assert!(request.prompt.contains("9. Risk Mitigation"));
        assert!(request.system.is_none());
    }

    #[test]
    fn test_analysis_prompts_carry_system_instructions() {
        let request = brand_analysis("findings");
        assert!(request.system.as_deref().unwrap_or("").contains("brand voice"));
        assert!(request.prompt.ends_with("findings"));
    }
}
