//! HTML bodies for mission notification emails.

use crate::domain::catalog::category_color;

/// Shared header gradient.
const HEADER_STYLE: &str =
    "background: linear-gradient(135deg, #2C2745 0%, #3E757B 100%); padding: 30px; text-align: center;";

/// Values substituted into a single-mission email.
#[derive(Debug, Clone)]
pub struct MissionEmailParams<'a> {
    /// Mission title.
    pub mission_title: &'a str,
    /// Raw category id, used for the badge color.
    pub category: &'a str,
    /// `{category name} [{show}]` label.
    pub display_category: &'a str,
    /// Recipient nickname.
    pub nickname: &'a str,
    /// Link target of the call to action.
    pub link_url: &'a str,
    /// Site root without trailing slash.
    pub base_url: &'a str,
}

/// Escape text for inclusion in HTML.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Email announcing a new mission.
#[must_use]
pub fn new_mission_email(params: &MissionEmailParams<'_>) -> String {
    single_mission_email(
        params,
        "새로운 미션 알림",
        &format!("{} 새로운 미션이 도착했습니다!", escape_html(params.display_category)),
        "관심 카테고리에 새로운 미션이 등록되었습니다. 지금 바로 확인해보세요!",
        "미션 확인하기 →",
    )
}

/// Email telling a participant that a mission closed.
#[must_use]
pub fn deadline_email(params: &MissionEmailParams<'_>) -> String {
    single_mission_email(
        params,
        "미션 마감 알림",
        &format!("참여하신 {} 미션이 마감되었습니다!", escape_html(params.display_category)),
        "참여하신 미션이 종료되었습니다. 최종 결과를 확인해보세요!",
        "결과 확인하기 →",
    )
}

/// One line of a digest email.
#[derive(Debug, Clone)]
pub struct DigestLine {
    /// Mission title.
    pub title: String,
    /// Display category.
    pub display_category: String,
    /// Raw category id.
    pub category: String,
    /// Vote page.
    pub url: String,
}

/// Digest listing several missions.
#[must_use]
pub fn digest_email(nickname: &str, slot_label: &str, lines: &[DigestLine], base_url: &str) -> String {
    let items: String = lines
        .iter()
        .map(|line| {
            let color = category_color(&line.category);
            format!(
                r#"<tr><td style="padding: 12px 0; border-bottom: 1px solid #E5E7EB;">
<span style="display: inline-block; background-color: {color}; color: #FFFFFF; padding: 4px 10px; border-radius: 12px; font-size: 12px; font-weight: bold;">{category}</span>
<a href="{url}" target="_blank" rel="noopener noreferrer" style="display: block; margin-top: 6px; color: #1F2937; font-size: 16px; font-weight: bold; text-decoration: none;">{title}</a>
</td></tr>"#,
                category = escape_html(&line.display_category),
                url = line.url,
                title = escape_html(&line.title),
            )
        })
        .collect();

    layout(
        "오늘의 새 미션",
        &format!("{slot_label} 새 미션 {}개가 도착했습니다!", lines.len()),
        &format!(
            r#"<p style="margin: 0 0 20px 0; color: #374151; font-size: 16px; line-height: 1.5;">안녕하세요, <strong>{nickname}</strong>님!</p>
<table width="100%" cellpadding="0" cellspacing="0">{items}</table>"#,
            nickname = escape_html(nickname),
        ),
        base_url,
    )
}

fn single_mission_email(
    params: &MissionEmailParams<'_>,
    page_title: &str,
    header_line: &str,
    lead: &str,
    cta: &str,
) -> String {
    let color = category_color(params.category);
    let body = format!(
        r#"<p style="margin: 0 0 20px 0; color: #374151; font-size: 16px; line-height: 1.5;">안녕하세요, <strong>{nickname}</strong>님!</p>
<div style="margin-bottom: 20px;">
  <span style="display: inline-block; background-color: {color}; color: #FFFFFF; padding: 8px 16px; border-radius: 20px; font-size: 14px; font-weight: bold;">{category}</span>
</div>
<div style="background-color: #F9FAFB; border-left: 4px solid {color}; padding: 20px; margin-bottom: 30px; border-radius: 8px;">
  <h2 style="margin: 0 0 10px 0; color: #1F2937; font-size: 20px; font-weight: bold;">{title}</h2>
  <p style="margin: 0; color: #6B7280; font-size: 14px;">{lead}</p>
</div>
<table width="100%" cellpadding="0" cellspacing="0">
  <tr>
    <td align="center" style="padding-top: 10px; padding-bottom: 20px;">
      <a href="{url}" target="_blank" rel="noopener noreferrer" style="display: inline-block; background-color: {color}; color: #FFFFFF; text-decoration: none; padding: 16px 40px; border-radius: 8px; font-size: 16px; font-weight: bold;">{cta}</a>
    </td>
  </tr>
</table>"#,
        nickname = escape_html(params.nickname),
        category = escape_html(params.display_category),
        title = escape_html(params.mission_title),
        url = params.link_url,
    );
    layout(page_title, header_line, &body, params.base_url)
}

fn layout(page_title: &str, header_line: &str, body: &str, base_url: &str) -> String {
    let profile_url = format!("{base_url}/p-profile");
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{page_title}</title>
</head>
<body style="font-family: Arial, sans-serif; margin: 0; padding: 0; background-color: #F9FAFB;">
  <table width="100%" cellpadding="0" cellspacing="0" style="background-color: #F9FAFB; padding: 40px 20px;">
    <tr>
      <td align="center">
        <table width="600" cellpadding="0" cellspacing="0" style="background-color: #FFFFFF; border-radius: 12px; overflow: hidden;">
          <tr>
            <td style="{HEADER_STYLE}">
              <h1 style="margin: 0; color: #FFFFFF; font-size: 28px; font-weight: bold;">리얼픽</h1>
              <p style="margin: 10px 0 0 0; color: #E5E7EB; font-size: 14px;">{header_line}</p>
            </td>
          </tr>
          <tr>
            <td style="padding: 40px 30px;">
{body}
            </td>
          </tr>
          <tr>
            <td style="background-color: #F3F4F6; padding: 20px 30px; border-top: 1px solid #E5E7EB;">
              <p style="margin: 0 0 10px 0; color: #6B7280; font-size: 12px; line-height: 1.5;">이 이메일은 리얼픽 알림 설정에 따라 발송되었습니다.</p>
              <p style="margin: 0; color: #9CA3AF; font-size: 12px;">알림 설정을 변경하려면 <a href="{profile_url}" style="color: #2563EB; text-decoration: none;">프로필 페이지</a>를 방문하세요.</p>
            </td>
          </tr>
        </table>
      </td>
    </tr>
  </table>
</body>
</html>"#
    )
}
